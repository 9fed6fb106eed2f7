//! QAQF 分级与特征
//!
//! 固定的外部分类体系，这里只做查表，不参与计算

use phf::phf_map;

/// 最低和最高等级
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 9;

static LEVEL_NAMES: phf::Map<u8, &'static str> = phf_map! {
    1u8 => "Basic",
    2u8 => "Rudimentary",
    3u8 => "Crucial",
    4u8 => "Key",
    5u8 => "Substantial",
    6u8 => "Critical",
    7u8 => "Leading",
    8u8 => "Specialist",
    9u8 => "21st Century Innovative",
};

static CHARACTERISTICS: phf::Map<u8, (&'static str, &'static str)> = phf_map! {
    1u8 => ("Knowledge and understanding", "foundation"),
    2u8 => ("Applied knowledge", "foundation"),
    3u8 => ("Cognitive skills", "foundation"),
    4u8 => ("Communication", "intermediate"),
    5u8 => ("Autonomy, accountability & working with others", "intermediate"),
    6u8 => ("Digitalisation & AI", "intermediate"),
    7u8 => ("Sustainability & ecological", "advanced"),
    8u8 => ("Reflective & creative", "advanced"),
    9u8 => ("Futuristic/Genius Skills", "advanced"),
};

/// 等级名称，未知等级返回 None
pub fn level_name(level: u8) -> Option<&'static str> {
    LEVEL_NAMES.get(&level).copied()
}

pub fn is_valid_level(level: u8) -> bool {
    (MIN_LEVEL..=MAX_LEVEL).contains(&level)
}

/// 特征名称
pub fn characteristic_name(id: u8) -> Option<&'static str> {
    CHARACTERISTICS.get(&id).map(|(name, _)| *name)
}

/// 特征分类（foundation / intermediate / advanced）
pub fn characteristic_category(id: u8) -> Option<&'static str> {
    CHARACTERISTICS.get(&id).map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_levels_and_characteristics() {
        assert_eq!(level_name(1), Some("Basic"));
        assert_eq!(level_name(9), Some("21st Century Innovative"));
        assert_eq!(level_name(10), None);
        assert!(!is_valid_level(0));
        assert_eq!(characteristic_name(6), Some("Digitalisation & AI"));
        assert_eq!(characteristic_category(8), Some("advanced"));
    }
}
