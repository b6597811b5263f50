/// Sexagenary year pillar (년주) of a birth year.
///
/// Uses the Gregorian year number; births before the lunar new year are
/// attributed to the following pillar.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPillar {
    pub stem: &'static str,
    pub branch: &'static str,
    pub hanja: String,
    pub animal: &'static str,
    pub element: &'static str,
}

const STEMS: [(&str, char, &str); 10] = [
    ("갑", '甲', "wood"),
    ("을", '乙', "wood"),
    ("병", '丙', "fire"),
    ("정", '丁', "fire"),
    ("무", '戊', "earth"),
    ("기", '己', "earth"),
    ("경", '庚', "metal"),
    ("신", '辛', "metal"),
    ("임", '壬', "water"),
    ("계", '癸', "water"),
];

const BRANCHES: [(&str, char, &str); 12] = [
    ("자", '子', "rat"),
    ("축", '丑', "ox"),
    ("인", '寅', "tiger"),
    ("묘", '卯', "rabbit"),
    ("진", '辰', "dragon"),
    ("사", '巳', "snake"),
    ("오", '午', "horse"),
    ("미", '未', "goat"),
    ("신", '申', "monkey"),
    ("유", '酉', "rooster"),
    ("술", '戌', "dog"),
    ("해", '亥', "pig"),
];

impl YearPillar {
    pub fn for_year(year: i32) -> Self {
        // 4 CE was a 갑자 year.
        let offset = year - 4;
        let (stem, stem_hanja, element) = STEMS[offset.rem_euclid(10) as usize];
        let (branch, branch_hanja, animal) = BRANCHES[offset.rem_euclid(12) as usize];
        Self {
            stem,
            branch,
            hanja: format!("{}{}", stem_hanja, branch_hanja),
            animal,
            element,
        }
    }

    pub fn korean(&self) -> String {
        format!("{}{}년", self.stem, self.branch)
    }
}
