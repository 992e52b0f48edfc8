//! 干支、月日、節氣等的文本形式
//!
//! 各函數只按序號查表，不涉及曆法計算。

/// 漢數字，第 `1..=9` 項分別為「一」到「九」。為便於格式化日期，第 0 項為「十」。
pub const NUM_CHINESE: &[&str] = &["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 十天干，甲為 0
pub const STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
/// 十二地支，子為 0
pub const BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
const ZODIAC: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龍", "蛇", "馬", "羊", "猴", "雞", "狗", "豬",
];

/// 天干名，序號按 10 取模。
pub fn stem(index: u32) -> &'static str {
    STEMS[(index % 10) as usize]
}

/// 地支名，序號按 12 取模。
pub fn branch(index: u32) -> &'static str {
    BRANCHES[(index % 12) as usize]
}

/// 地支對應的生肖
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("兔", chinese::fmt::zodiac(3));
/// ```
pub fn zodiac(branch: u32) -> &'static str {
    ZODIAC[(branch % 12) as usize]
}

/// 干支序號轉為文本形式，0 為甲子。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("乙巳", chinese::fmt::sexagenary(41));
/// assert_eq!("癸卯", chinese::fmt::sexagenary(39));
/// ```
pub fn sexagenary(index: u32) -> String {
    stem(index).to_owned() + branch(index)
}

/// 取得月名（含「月」字）。十一、十二月稱「冬月」「臘月」。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("冬月", chinese::fmt::month(11, false));
/// assert_eq!("閏正月", chinese::fmt::month(1, true));
/// ```
///
/// # Panics
///
/// 若月序號不在 `1..=12` 間則 panic。
pub fn month(m: u32, is_leap: bool) -> String {
    let mut rt = String::new();
    if is_leap {
        rt += "閏";
    }
    rt += match m {
        1 => "正",
        2..=9 => NUM_CHINESE[m as usize],
        10 => "十",
        11 => "冬",
        12 => "臘",
        _ => panic!("month {} not in 1..=12", m),
    };
    rt += "月";
    rt
}

/// 取得日名，前十日為「初一」到「初十」，第 21 至 29 日為「廿一」到「廿九」。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("初十", chinese::fmt::day(10));
/// assert_eq!("廿五", chinese::fmt::day(25));
/// assert_eq!("三十", chinese::fmt::day(30));
/// ```
///
/// # Panics
///
/// 若日序號不在 `1..=30` 間則 panic。
pub fn day(d: u32) -> String {
    match d {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        30 => "三",
        _ => panic!("day {} not in 1..=30", d),
    }
    .to_owned()
        + NUM_CHINESE[(d % 10) as usize]
}

/// 節氣序號轉為名稱。`1..=24` 分別為立春到大寒。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("穀雨", chinese::fmt::solar_term(6));
/// ```
pub fn solar_term(term: u32) -> &'static str {
    const NAMES: &[&str] = &[
        "大寒", "立春", "雨水", "驚蟄", "春分", "清明", "穀雨", "立夏", "小滿", "芒種", "夏至",
        "小暑", "大暑", "立秋", "處暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪",
        "冬至", "小寒",
    ];
    NAMES[term.rem_euclid(24) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sexagenary() {
        for (std, num) in [("甲子", 0), ("庚寅", 26), ("癸亥", 59), ("甲子", 60)] {
            assert_eq!(std, sexagenary(num));
        }
    }

    #[test]
    fn test_month() {
        for (std, (m, leap)) in [
            ("正月", (1, false)),
            ("閏六月", (6, true)),
            ("十月", (10, false)),
            ("臘月", (12, false)),
        ] {
            assert_eq!(std, month(m, leap));
        }
    }

    #[test]
    fn test_day() {
        for (std, d) in [
            ("初一", 1),
            ("初十", 10),
            ("十一", 11),
            ("二十", 20),
            ("廿一", 21),
            ("三十", 30),
        ] {
            assert_eq!(std, day(d));
        }
    }

    #[test]
    fn test_solar_term() {
        assert_eq!("立春", solar_term(1));
        assert_eq!("大寒", solar_term(24));
        assert_eq!("冬至", solar_term(22));
    }
}
