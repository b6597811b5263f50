#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotCard {
    pub number: u8,
    pub name: &'static str,
    pub korean_name: &'static str,
    pub upright: &'static [&'static str],
    pub reversed: &'static [&'static str],
}

const fn card(
    number: u8,
    name: &'static str,
    korean_name: &'static str,
    upright: &'static [&'static str],
    reversed: &'static [&'static str],
) -> TarotCard {
    TarotCard {
        number,
        name,
        korean_name,
        upright,
        reversed,
    }
}

pub static MAJOR_ARCANA: [TarotCard; 22] = [
    card(0, "The Fool", "바보", &["new beginnings", "spontaneity", "faith"], &["recklessness", "hesitation", "naivety"]),
    card(1, "The Magician", "마법사", &["willpower", "skill", "manifestation"], &["manipulation", "untapped talent", "trickery"]),
    card(2, "The High Priestess", "여사제", &["intuition", "mystery", "inner voice"], &["secrets", "withdrawal", "disconnection"]),
    card(3, "The Empress", "여황제", &["abundance", "nurturing", "fertility"], &["dependence", "smothering", "creative block"]),
    card(4, "The Emperor", "황제", &["authority", "structure", "stability"], &["rigidity", "domination", "lack of discipline"]),
    card(5, "The Hierophant", "교황", &["tradition", "guidance", "belief"], &["rebellion", "unconventionality", "dogma"]),
    card(6, "The Lovers", "연인", &["love", "harmony", "choices"], &["imbalance", "misalignment", "indecision"]),
    card(7, "The Chariot", "전차", &["determination", "victory", "control"], &["aggression", "lack of direction", "obstacles"]),
    card(8, "Strength", "힘", &["courage", "compassion", "inner strength"], &["self-doubt", "weakness", "insecurity"]),
    card(9, "The Hermit", "은둔자", &["introspection", "solitude", "wisdom"], &["isolation", "loneliness", "withdrawal"]),
    card(10, "Wheel of Fortune", "운명의 수레바퀴", &["cycles", "luck", "turning point"], &["bad luck", "resistance", "broken cycles"]),
    card(11, "Justice", "정의", &["fairness", "truth", "balance"], &["injustice", "dishonesty", "avoidance"]),
    card(12, "The Hanged Man", "매달린 사람", &["surrender", "new perspective", "pause"], &["stalling", "resistance", "indecision"]),
    card(13, "Death", "죽음", &["endings", "transformation", "transition"], &["fear of change", "stagnation", "clinging"]),
    card(14, "Temperance", "절제", &["balance", "moderation", "patience"], &["excess", "imbalance", "haste"]),
    card(15, "The Devil", "악마", &["attachment", "temptation", "materialism"], &["release", "detachment", "freedom"]),
    card(16, "The Tower", "탑", &["upheaval", "revelation", "sudden change"], &["averted disaster", "fear of change", "delay"]),
    card(17, "The Star", "별", &["hope", "renewal", "inspiration"], &["despair", "discouragement", "lost faith"]),
    card(18, "The Moon", "달", &["illusion", "intuition", "uncertainty"], &["clarity", "released fear", "truth revealed"]),
    card(19, "The Sun", "태양", &["joy", "success", "vitality"], &["temporary sadness", "overconfidence", "delay"]),
    card(20, "Judgement", "심판", &["awakening", "reckoning", "rebirth"], &["self-doubt", "harsh judgement", "missed call"]),
    card(21, "The World", "세계", &["completion", "fulfilment", "wholeness"], &["incompletion", "shortcuts", "lack of closure"]),
];

impl TarotCard {
    /// Case-insensitive lookup by English or Korean name. A leading "The "
    /// may be omitted.
    pub fn by_name(name: &str) -> Option<&'static TarotCard> {
        let wanted = name.trim();
        MAJOR_ARCANA.iter().find(|c| {
            c.name.eq_ignore_ascii_case(wanted)
                || c.korean_name == wanted
                || c.name
                    .strip_prefix("The ")
                    .map(|short| short.eq_ignore_ascii_case(wanted))
                    .unwrap_or(false)
        })
    }

    pub fn keywords(&self, reversed: bool) -> &'static [&'static str] {
        if reversed {
            self.reversed
        } else {
            self.upright
        }
    }
}
