//! Reports the port Rocket actually bound to, so callers that asked for
//! port 0 can find the server.

use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use tokio::sync::watch;

pub fn create_pair() -> (PortReporter, BoundPort) {
    let (tx, rx) = watch::channel(None);
    (PortReporter { sender: tx }, BoundPort { receiver: rx })
}

#[derive(Clone)]
pub struct BoundPort {
    receiver: watch::Receiver<Option<u16>>,
}

impl BoundPort {
    /// Waits until the server has lifted off. Returns `None` if the server
    /// was dropped before binding.
    pub async fn get(&mut self) -> Option<u16> {
        loop {
            if let Some(port) = *self.receiver.borrow() {
                return Some(port);
            }
            if self.receiver.changed().await.is_err() {
                return *self.receiver.borrow();
            }
        }
    }
}

pub struct PortReporter {
    sender: watch::Sender<Option<u16>>,
}

#[rocket::async_trait]
impl Fairing for PortReporter {
    fn info(&self) -> Info {
        Info {
            name: "Bound port reporter",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(port, "Server is listening");
        // No receiver left just means nobody is waiting for the port.
        let _ = self.sender.send(Some(port));
    }
}
