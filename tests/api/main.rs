mod readings;
mod readings_generation;
mod upstream;
mod zodiac;
