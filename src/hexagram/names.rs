use serde::Serialize;

/// Canonical name of a hexagram in the King Wen sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HexagramInfo {
    pub number: u8,
    /// Pinyin name.
    pub name: &'static str,
    /// Conventional English title.
    pub title: &'static str,
}

const NAMES: [(&str, &str); 64] = [
    ("Qian", "The Creative"),
    ("Kun", "The Receptive"),
    ("Zhun", "Difficulty at the Beginning"),
    ("Meng", "Youthful Folly"),
    ("Xu", "Waiting"),
    ("Song", "Conflict"),
    ("Shi", "The Army"),
    ("Bi", "Holding Together"),
    ("Xiao Chu", "The Taming Power of the Small"),
    ("Lü", "Treading"),
    ("Tai", "Peace"),
    ("Pi", "Standstill"),
    ("Tong Ren", "Fellowship with Men"),
    ("Da You", "Possession in Great Measure"),
    ("Qian", "Modesty"),
    ("Yu", "Enthusiasm"),
    ("Sui", "Following"),
    ("Gu", "Work on What Has Been Spoiled"),
    ("Lin", "Approach"),
    ("Guan", "Contemplation"),
    ("Shi He", "Biting Through"),
    ("Bi", "Grace"),
    ("Bo", "Splitting Apart"),
    ("Fu", "Return"),
    ("Wu Wang", "Innocence"),
    ("Da Chu", "The Taming Power of the Great"),
    ("Yi", "The Corners of the Mouth"),
    ("Da Guo", "Preponderance of the Great"),
    ("Kan", "The Abysmal"),
    ("Li", "The Clinging"),
    ("Xian", "Influence"),
    ("Heng", "Duration"),
    ("Dun", "Retreat"),
    ("Da Zhuang", "The Power of the Great"),
    ("Jin", "Progress"),
    ("Ming Yi", "Darkening of the Light"),
    ("Jia Ren", "The Family"),
    ("Kui", "Opposition"),
    ("Jian", "Obstruction"),
    ("Xie", "Deliverance"),
    ("Sun", "Decrease"),
    ("Yi", "Increase"),
    ("Guai", "Break-through"),
    ("Gou", "Coming to Meet"),
    ("Cui", "Gathering Together"),
    ("Sheng", "Pushing Upward"),
    ("Kun", "Oppression"),
    ("Jing", "The Well"),
    ("Ge", "Revolution"),
    ("Ding", "The Cauldron"),
    ("Zhen", "The Arousing"),
    ("Gen", "Keeping Still"),
    ("Jian", "Development"),
    ("Gui Mei", "The Marrying Maiden"),
    ("Feng", "Abundance"),
    ("Lü", "The Wanderer"),
    ("Xun", "The Gentle"),
    ("Dui", "The Joyous"),
    ("Huan", "Dispersion"),
    ("Jie", "Limitation"),
    ("Zhong Fu", "Inner Truth"),
    ("Xiao Guo", "Preponderance of the Small"),
    ("Ji Ji", "After Completion"),
    ("Wei Ji", "Before Completion"),
];

pub fn hexagram_info(number: u8) -> Option<HexagramInfo> {
    let (name, title) = NAMES.get(usize::from(number).checked_sub(1)?)?;
    Some(HexagramInfo {
        number,
        name,
        title,
    })
}

// Numbers coming out of the King Wen table are always in 1..=64.
pub(crate) fn table_info(number: u8) -> HexagramInfo {
    let (name, title) = NAMES[usize::from(number) - 1];
    HexagramInfo {
        number,
        name,
        title,
    }
}
