//! 天文曆表
//!
//! 編算夏曆只須兩項天文原語：太陽視黃經到達某一 15° 倍數的時刻（定氣），以及某一朔望月的合朔時刻（定朔）。
//! 二者以 [`Ephemeris`] 特徵抽象，調用方可自行注入；本模塊另提供 [`Meeus`] 作為預設實現：
//!
//! - 太陽位置取 VSOP87 地球級數的截斷形式，加 FK5 改正、黃經章動與光行差；
//! - 合朔取平朔加週期修正項與十四項行星攝動。
//!
//! 所有時刻均為力學時（[`Tt`]），轉為民用時刻須扣除 ΔT，見 [`crate::time_scales`]。

use crate::error::{Error, Result};
use crate::julian::J2000;
use crate::time_scales::Tt;

/// 回歸年長度（日）
pub const TROPICAL_YEAR: f64 = 365.2422;
/// 朔望月平均長度（日），用作推算合朔的步長
pub const SYNODIC_MONTH: f64 = 29.5306;

/// 曆法編算所需的天文原語。
///
/// 實現須可在多線程下並發調用。
pub trait Ephemeris: Send + Sync {
    /// 太陽視黃經「累計值」等於 `(year_seed − 2000)·360° + multiple·15°` 的時刻。
    ///
    /// 累計值以 J2000.0 附近的黃經為基準連續計數，不取模，故 `year_seed = 2001`、`multiple = 18`
    /// 即 2000 年冬至。
    fn solar_longitude_crossing(&self, multiple: i32, year_seed: f64) -> Result<Tt>;

    /// 距 `reference` 最近的合朔時刻。
    ///
    /// 朔望月依 `k = round((reference − 2451551) / 29.5306)` 編號，即以 2000 年 1 月 6 日之朔為第 0 月。
    fn nearest_lunation(&self, reference: Tt) -> Result<Tt>;
}

/// 預設天文曆表，算法取自 Jean Meeus《Astronomical Algorithms》。
///
/// 適用於數千年範圍，節氣誤差約在分鐘量級，合朔誤差在數十秒量級；遠古年代誤差主要來自 ΔT。
///
/// # 用例
///
/// ```
/// use nongli::chinese::ephemeris::{Ephemeris, Meeus};
///
/// // 2000 年冬至，北京時間 12 月 21 日 21:37
/// let tt = Meeus.solar_longitude_crossing(18, 2001.0).unwrap();
/// assert!((tt.0 - 2451900.068).abs() < 0.002);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Meeus;

const MAX_ITERATIONS: usize = 20;
const TOLERANCE_DEGREES: f64 = 1e-7;

impl Ephemeris for Meeus {
    #[tracing::instrument(level = "trace", skip(self))]
    fn solar_longitude_crossing(&self, multiple: i32, year_seed: f64) -> Result<Tt> {
        if !year_seed.is_finite() {
            return Err(Error::EphemerisUnavailable(format!(
                "non-finite year seed {year_seed}"
            )));
        }
        let target = (year_seed - 2000.0) * 360.0 + f64::from(multiple) * 15.0;
        // Mean longitude is about 280.46° at J2000.0.
        let mut jd = J2000 + (target - 280.46) / 360.0 * TROPICAL_YEAR;
        for _ in 0..MAX_ITERATIONS {
            let diff = wrap_degrees(target - apparent_solar_longitude(Tt(jd)));
            jd += diff / 360.0 * TROPICAL_YEAR;
            if diff.abs() < TOLERANCE_DEGREES {
                return Ok(Tt(jd));
            }
        }
        Err(Error::EphemerisUnavailable(format!(
            "solar longitude {target}° did not converge"
        )))
    }

    fn nearest_lunation(&self, reference: Tt) -> Result<Tt> {
        if !reference.0.is_finite() {
            return Err(Error::EphemerisUnavailable(format!(
                "non-finite lunation reference {}",
                reference.0
            )));
        }
        let k = ((reference.0 - 2451551.0) / SYNODIC_MONTH + 0.5).floor();
        Ok(Tt(true_new_moon(k)))
    }
}

/// 把角度差化到 `[-180°, 180°)`。
fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// 太陽視黃經（度，`0..360`）。
///
/// # 用例
///
/// ```
/// use nongli::chinese::ephemeris::apparent_solar_longitude;
/// use nongli::time_scales::Tt;
///
/// // 2000 年春分前後
/// let lon = apparent_solar_longitude(Tt(2451623.817));
/// assert!(lon < 0.01 || lon > 359.99);
/// ```
pub fn apparent_solar_longitude(tt: Tt) -> f64 {
    let t = (tt.0 - J2000) / 36525.0;
    let tau = t / 10.0;
    let geometric = earth_longitude(tau).to_degrees() + 180.0;
    let radius = earth_radius(tau);
    // FK5 改正，黃緯近零故略去後項
    let fk5 = -0.09033 / 3600.0;
    let aberration = -20.4898 / 3600.0 / radius;
    (geometric + fk5 + nutation_in_longitude(t) + aberration).rem_euclid(360.0)
}

/// 黃經章動（度），取四項主要週期。
fn nutation_in_longitude(t: f64) -> f64 {
    let omega = (125.04452 - 1934.136261 * t).to_radians();
    let sun = (280.4665 + 36000.7698 * t).to_radians();
    let moon = (218.3165 + 481267.8813 * t).to_radians();
    (-17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * omega).sin())
        / 3600.0
}

fn series(terms: &[[f64; 3]], tau: f64) -> f64 {
    terms.iter().map(|[a, b, c]| a * (b + c * tau).cos()).sum()
}

/// 地球日心黃經（弧度）
fn earth_longitude(tau: f64) -> f64 {
    let powers = [L0, L1, L2, L3, L4, L5];
    let mut sum = 0.0;
    for terms in powers.iter().rev() {
        sum = sum * tau + series(terms, tau);
    }
    sum / 1e8
}

/// 日地距離（天文單位）
fn earth_radius(tau: f64) -> f64 {
    (series(R0, tau) + tau * (series(R1, tau) + tau * series(R2, tau))) / 1e8
}

/// 定朔：第 `k` 個朔望月的合朔時刻（力學時儒略日）。
///
/// # 用例
///
/// ```
/// use nongli::chinese::ephemeris::true_new_moon;
///
/// // 1977 年 2 月 18 日之朔
/// assert!((true_new_moon(-283.0) - 2443192.65118).abs() < 1e-4);
/// ```
pub fn true_new_moon(k: f64) -> f64 {
    let t = k / 1236.85;
    let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);
    let mean = 2451550.09766 + 29.530588861 * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = (2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3).to_radians();
    let mp = (201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4)
        .to_radians();
    let f = (160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3
        + 0.000000011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3).to_radians();

    let periodic = -0.40720 * mp.sin()
        + 0.17241 * e * m.sin()
        + 0.01608 * (2.0 * mp).sin()
        + 0.01039 * (2.0 * f).sin()
        + 0.00739 * e * (mp - m).sin()
        - 0.00514 * e * (mp + m).sin()
        + 0.00208 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin();

    let planetary: f64 = PLANETARY_ARGUMENTS
        .iter()
        .enumerate()
        .map(|(i, &(coefficient, base, rate))| {
            let mut arg = base + rate * k;
            if i == 0 {
                arg -= 0.009173 * t2;
            }
            coefficient * arg.to_radians().sin()
        })
        .sum::<f64>()
        * 1e-6;

    mean + periodic + planetary
}

/// `(係數 ×1e-6 日, 初值°, 每月增量°)`，即 A1..A14
const PLANETARY_ARGUMENTS: [(f64, f64, f64); 14] = [
    (325.0, 299.77, 0.107408),
    (165.0, 251.88, 0.016321),
    (164.0, 251.83, 26.651886),
    (126.0, 349.42, 36.412478),
    (110.0, 84.66, 18.206239),
    (62.0, 141.74, 53.303771),
    (60.0, 207.14, 2.453732),
    (56.0, 154.84, 7.306860),
    (47.0, 34.52, 27.261239),
    (42.0, 207.19, 0.121824),
    (40.0, 291.34, 1.844379),
    (37.0, 161.72, 24.198154),
    (35.0, 239.56, 25.513099),
    (23.0, 331.55, 3.592518),
];

#[rustfmt::skip]
const L0: &[[f64; 3]] = &[
    [175347046.0, 0.0, 0.0],
    [3341656.0, 4.6692568, 6283.0758500],
    [34894.0, 4.62610, 12566.15170],
    [3497.0, 2.7441, 5753.3849],
    [3418.0, 2.8289, 3.5231],
    [3136.0, 3.6277, 77713.7715],
    [2676.0, 4.4181, 7860.4194],
    [2343.0, 6.1352, 3930.2097],
    [1324.0, 0.7425, 11506.7698],
    [1273.0, 2.0371, 529.6910],
    [1199.0, 1.1096, 1577.3435],
    [990.0, 5.233, 5884.927],
    [902.0, 2.045, 26.298],
    [857.0, 3.508, 398.149],
    [780.0, 1.179, 5223.694],
    [753.0, 2.533, 5507.553],
    [505.0, 4.583, 18849.228],
    [492.0, 4.205, 775.523],
    [357.0, 2.920, 0.067],
    [317.0, 5.849, 11790.629],
    [284.0, 1.899, 796.298],
    [271.0, 0.315, 10977.079],
    [243.0, 0.345, 5486.778],
    [206.0, 4.806, 2544.314],
    [205.0, 1.869, 5573.143],
    [202.0, 2.458, 6069.777],
    [156.0, 0.833, 213.299],
    [132.0, 3.411, 2942.463],
    [126.0, 1.083, 20.775],
    [115.0, 0.645, 0.980],
    [103.0, 0.636, 4694.003],
    [102.0, 0.976, 15720.839],
    [102.0, 4.267, 7.114],
    [99.0, 6.21, 2146.17],
    [98.0, 0.68, 155.42],
    [86.0, 5.98, 161000.69],
    [85.0, 1.30, 6275.96],
    [85.0, 3.67, 71430.70],
    [80.0, 1.81, 17260.15],
    [79.0, 3.04, 12036.46],
    [75.0, 1.76, 5088.63],
    [74.0, 3.50, 3154.69],
    [74.0, 4.68, 801.82],
    [70.0, 0.83, 9437.76],
    [62.0, 3.98, 8827.39],
    [61.0, 1.82, 7084.90],
    [57.0, 2.78, 6286.60],
    [56.0, 4.39, 14143.50],
    [56.0, 3.47, 6279.55],
    [52.0, 0.19, 12139.55],
    [52.0, 1.33, 1748.02],
    [51.0, 0.28, 5856.48],
    [49.0, 0.49, 1194.45],
    [41.0, 5.37, 8429.24],
    [41.0, 2.40, 19651.05],
    [39.0, 6.17, 10447.39],
    [37.0, 6.04, 10213.29],
    [37.0, 2.57, 1059.38],
    [36.0, 1.71, 2352.87],
    [36.0, 1.78, 6812.77],
    [33.0, 0.59, 17789.85],
    [30.0, 0.44, 83996.85],
    [30.0, 2.74, 1349.87],
    [25.0, 3.16, 4690.48],
];

#[rustfmt::skip]
const L1: &[[f64; 3]] = &[
    [628331966747.0, 0.0, 0.0],
    [206059.0, 2.678235, 6283.075850],
    [4303.0, 2.6351, 12566.1517],
    [425.0, 1.590, 3.523],
    [119.0, 5.796, 26.298],
    [109.0, 2.966, 1577.344],
    [93.0, 2.59, 18849.23],
    [72.0, 1.14, 529.69],
    [68.0, 1.87, 398.15],
    [67.0, 4.41, 5507.55],
    [59.0, 2.89, 5223.69],
    [56.0, 2.17, 155.42],
    [45.0, 0.40, 796.30],
    [36.0, 0.47, 775.52],
    [29.0, 2.65, 7.11],
    [21.0, 5.34, 0.98],
    [19.0, 1.85, 5486.78],
    [19.0, 4.97, 213.30],
    [17.0, 2.99, 6275.96],
    [16.0, 0.03, 2544.31],
    [16.0, 1.43, 2146.17],
    [15.0, 1.21, 10977.08],
    [12.0, 2.83, 1748.02],
    [12.0, 3.26, 5088.63],
    [12.0, 5.27, 1194.45],
    [12.0, 2.08, 4694.00],
    [11.0, 0.77, 553.57],
    [10.0, 1.30, 6286.60],
    [10.0, 4.24, 1349.87],
    [9.0, 2.70, 242.73],
    [9.0, 5.64, 951.72],
    [8.0, 5.30, 2352.87],
    [6.0, 2.65, 9437.76],
    [6.0, 4.67, 4690.48],
];

#[rustfmt::skip]
const L2: &[[f64; 3]] = &[
    [52919.0, 0.0, 0.0],
    [8720.0, 1.0721, 6283.0758],
    [309.0, 0.867, 12566.152],
    [27.0, 0.05, 3.52],
    [16.0, 5.19, 26.30],
    [16.0, 3.68, 155.42],
    [10.0, 0.76, 18849.23],
    [9.0, 2.06, 77713.77],
    [7.0, 0.83, 775.52],
    [5.0, 4.66, 1577.34],
    [4.0, 1.03, 7.11],
    [4.0, 3.44, 5573.14],
    [3.0, 5.14, 796.30],
    [3.0, 6.05, 5507.55],
    [3.0, 1.19, 242.73],
    [3.0, 6.12, 529.69],
    [3.0, 0.31, 398.15],
    [3.0, 2.28, 553.57],
    [2.0, 4.38, 5223.69],
    [2.0, 3.75, 0.98],
];

#[rustfmt::skip]
const L3: &[[f64; 3]] = &[
    [289.0, 5.844, 6283.076],
    [35.0, 0.0, 0.0],
    [17.0, 5.49, 12566.15],
    [3.0, 5.20, 155.42],
    [1.0, 4.72, 3.52],
    [1.0, 5.30, 18849.23],
    [1.0, 5.97, 242.73],
];

const L4: &[[f64; 3]] = &[[114.0, 3.142, 0.0], [8.0, 4.13, 6283.08], [1.0, 3.84, 12566.15]];

const L5: &[[f64; 3]] = &[[1.0, 3.14, 0.0]];

#[rustfmt::skip]
const R0: &[[f64; 3]] = &[
    [100013989.0, 0.0, 0.0],
    [1670700.0, 3.0984635, 6283.0758500],
    [13956.0, 3.05525, 12566.15170],
    [3084.0, 5.1985, 77713.7715],
    [1628.0, 1.1739, 5753.3849],
    [1576.0, 2.8469, 7860.4194],
    [925.0, 5.453, 11506.770],
    [542.0, 4.564, 3930.210],
    [472.0, 3.661, 5884.927],
    [346.0, 0.964, 5507.553],
    [329.0, 5.900, 5223.694],
    [307.0, 0.299, 5573.143],
    [243.0, 4.273, 11790.629],
    [212.0, 5.847, 1577.344],
    [186.0, 5.022, 10977.079],
    [175.0, 3.012, 18849.228],
];

const R1: &[[f64; 3]] = &[
    [103019.0, 1.107490, 6283.075850],
    [1721.0, 1.0644, 12566.1517],
    [702.0, 3.142, 0.0],
    [32.0, 1.02, 18849.23],
    [31.0, 2.84, 5507.55],
    [25.0, 1.32, 5223.69],
];

const R2: &[[f64; 3]] = &[[4359.0, 5.7846, 6283.0758], [124.0, 5.579, 12566.152], [12.0, 3.14, 0.0]];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn solar_terms() {
        // (力學時儒略日, multiple, year_seed)
        for (std, multiple, seed) in [
            (2451623.8167, 24, 2000.0), // 2000 春分，UTC 07:35
            (2451900.0681, 18, 2001.0), // 2000 冬至，UTC 13:37
            (2451716.5757, 30, 2000.0), // 2000 夏至，UTC 01:48
        ] {
            let tt = Meeus.solar_longitude_crossing(multiple, seed).unwrap();
            assert_abs_diff_eq!(std, tt.0, epsilon = 2e-3);
        }
    }

    #[test]
    fn cumulative_longitude_is_monotone() {
        let mut last = f64::MIN;
        for multiple in 0..48 {
            let tt = Meeus.solar_longitude_crossing(multiple, 2023.0).unwrap();
            assert!(tt.0 > last);
            last = tt.0;
        }
    }

    #[test]
    fn distant_years_converge() {
        for seed in [-4000.0, -500.0, 1.0, 1582.0, 5000.0, 9999.0] {
            assert!(Meeus.solar_longitude_crossing(18, seed).is_ok());
        }
    }

    #[test]
    fn new_moons() {
        // 2000-01-06 18:14 UTC
        let tt = Meeus.nearest_lunation(Tt(2451551.0)).unwrap();
        assert_abs_diff_eq!(2451550.2604, tt.0, epsilon = 1e-3);
        let tt = Meeus.nearest_lunation(Tt(2451551.0 + 14.0)).unwrap();
        assert_abs_diff_eq!(2451550.2604, tt.0, epsilon = 1e-3);
        let tt = Meeus.nearest_lunation(Tt(2451551.0 + 15.0)).unwrap();
        assert!(tt.0 > 2451570.0);
    }

    #[test]
    fn non_finite_inputs() {
        assert!(matches!(
            Meeus.solar_longitude_crossing(0, f64::NAN),
            Err(Error::EphemerisUnavailable(_))
        ));
        assert!(matches!(
            Meeus.nearest_lunation(Tt(f64::INFINITY)),
            Err(Error::EphemerisUnavailable(_))
        ));
    }

    #[test]
    fn wrap() {
        assert_abs_diff_eq!(-1.0, wrap_degrees(359.0), epsilon = 1e-12);
        assert_abs_diff_eq!(1.0, wrap_degrees(-359.0), epsilon = 1e-12);
    }
}
