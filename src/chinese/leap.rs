//! 閏月例外表
//!
//! 以定氣定朔推得的置閏位置與歷代實行曆書偶有出入，下列年份的閏月以表為準，不以無中氣規則推求。
//! 表中年份即閏月所在的農曆年：閏十一月或閏十二月位於該年年末，即冬至所在月之後的第 1 或 2 個月。
//! 置閏以歲（冬至所在月至下一冬至所在月之前）為單位，故表中 Y 年的閏月屬於自 Y 年十一月起的一歲；
//! 該歲按曆表推算須有 13 個月，否則例外不適用。
//! 表收公元 37 至 10000 年，範圍以外純按規則置閏，可信度較低。

/// 閏十一月的年份
pub const LEAP_ELEVENTH: &[i32] = &[
    75, 94, 170, 238, 265, 322, 389, 469, 553, 583, 610, 678, 735, 754, 773, 849, 887, 936, 1050,
    1069, 1126, 1145, 1164, 1183, 1259, 1278, 1308, 1373, 1403, 1441, 1460, 1498, 1555, 1593, 1612,
    1631, 1642, 2033, 2128, 2147, 2242, 2614, 2728, 2910, 3062, 3244, 3339, 3616, 3711, 3730, 3825,
    4007, 4159, 4197, 4322, 4341, 4379, 4417, 4531, 4599, 4694, 4713, 4789, 4808, 4971, 5085, 5104,
    5161, 5180, 5199, 5294, 5305, 5476, 5677, 5696, 5772, 5791, 5848, 5886, 6049, 6068, 6144, 6163,
    6258, 6402, 6440, 6497, 6516, 6630, 6641, 6660, 6679, 6736, 6774, 6850, 6869, 6899, 6918, 6994,
    7013, 7032, 7051, 7070, 7089, 7108, 7127, 7146, 7222, 7271, 7290, 7309, 7366, 7385, 7404, 7442,
    7461, 7480, 7491, 7499, 7594, 7624, 7643, 7662, 7681, 7719, 7738, 7814, 7863, 7882, 7901, 7939,
    7958, 7977, 7996, 8034, 8053, 8072, 8091, 8121, 8159, 8186, 8216, 8235, 8254, 8273, 8311, 8330,
    8341, 8349, 8368, 8444, 8463, 8474, 8493, 8531, 8569, 8588, 8626, 8664, 8683, 8694, 8702, 8713,
    8721, 8751, 8789, 8808, 8816, 8827, 8846, 8884, 8903, 8922, 8941, 8971, 9036, 9066, 9085, 9104,
    9123, 9142, 9161, 9180, 9199, 9218, 9256, 9294, 9313, 9324, 9343, 9362, 9381, 9419, 9438, 9476,
    9514, 9533, 9544, 9552, 9563, 9571, 9582, 9601, 9639, 9658, 9666, 9677, 9696, 9734, 9753, 9772,
    9791, 9802, 9821, 9886, 9897, 9916, 9935, 9954, 9973, 9992,
];

/// 閏十二月的年份，出現於 `LunarYear` 第 14 個月。
pub const LEAP_TWELFTH: &[i32] = &[
    37, 56, 113, 132, 151, 189, 208, 227, 246, 284, 303, 341, 360, 379, 417, 436, 458, 477, 496,
    515, 534, 572, 591, 629, 648, 667, 697, 716, 792, 811, 830, 868, 906, 925, 944, 963, 982, 1001,
    1020, 1039, 1058, 1088, 1153, 1202, 1221, 1240, 1297, 1335, 1392, 1411, 1422, 1430, 1517, 1525,
    1536, 1574, 3358, 3472, 3806, 3988, 4751, 4941, 5066, 5123, 5275, 5343, 5438, 5457, 5495, 5533,
    5552, 5715, 5810, 5829, 5905, 5924, 6421, 6535, 6793, 6812, 6888, 6907, 7002, 7184, 7260, 7279,
    7374, 7556, 7746, 7757, 7776, 7833, 7852, 7871, 7966, 8015, 8110, 8129, 8148, 8224, 8243, 8338,
    8406, 8425, 8482, 8501, 8520, 8558, 8596, 8607, 8615, 8645, 8740, 8778, 8835, 8865, 8930, 8960,
    8979, 8998, 9017, 9055, 9074, 9093, 9112, 9150, 9188, 9237, 9275, 9332, 9351, 9370, 9408, 9427,
    9446, 9457, 9465, 9495, 9560, 9590, 9628, 9647, 9685, 9715, 9742, 9780, 9810, 9818, 9829, 9848,
    9867, 9905, 9924, 9943, 9962, 10000,
];

/// 推求首朔時，若所得之朔晚於冬至，一般須退一月；下列年份例外，惟前後兩歲須仍各為 12 或 13 個月。
pub const SEED_EXCEPTIONS: &[i32] = &[41, 193, 288, 345, 918, 1013];

/// 例外表覆蓋的年份範圍
pub const CURATED_YEARS: std::ops::RangeInclusive<i32> = 37..=10000;

/// 查閏月例外表。
///
/// 返回自 `year − 1` 年十一月起之一歲中閏月的位置：冬至所在月為 0，閏十一月為 1，閏十二月為 2。
///
/// # 用例
///
/// ```
/// use nongli::chinese::leap::leap_override;
///
/// assert_eq!(None, leap_override(2033));
/// assert_eq!(Some(1), leap_override(2034));
/// assert_eq!(None, leap_override(2023));
/// ```
pub fn leap_override(year: i32) -> Option<usize> {
    let previous = year - 1;
    if LEAP_ELEVENTH.binary_search(&previous).is_ok() {
        Some(1)
    } else if LEAP_TWELFTH.binary_search(&previous).is_ok() {
        Some(2)
    } else {
        None
    }
}

/// 首朔是否豁免退月。
pub fn keeps_seed(year: i32) -> bool {
    SEED_EXCEPTIONS.contains(&year)
}
