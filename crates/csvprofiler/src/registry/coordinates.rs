//! Geographic coordinate patterns.
//!
//! Sexagesimal forms use `°`, `'`/`′` and `"`/`″`; the sign is either a
//! leading `+`, `-`, `−` or hemisphere letter, or a trailing hemisphere
//! letter. Every pattern is unanchored; the catalogue anchors them.

use crate::schema::NamedTest;

const SIGN: &str = "[-+\u{2212}]";
const LAT_DEG: &str = "(?:[1-8][0-9]|[0-9])";
const LON_DEG: &str = "(?:1[0-7][0-9]|[1-9][0-9]|[0-9])";
const MINUTES: &str = "['\u{2032}]";
const SECONDS: &str = "[\"\u{2033}]";
const PAIR_SEPARATOR: &str = r"(?:\s|[,;]\s?)";

/// Degrees, minutes and seconds, seconds to four places.
fn dms(deg: &str, max: &str) -> String {
    format!(
        r"(?:{max}°\s?00{MINUTES}(?:\s?00{SECONDS})?|{deg}°\s?[0-5][0-9]{MINUTES}\s?[0-5][0-9](?:\.[0-9]{{1,4}})?{SECONDS})"
    )
}

/// Degrees and minutes, minutes to six places.
fn dm(deg: &str, max: &str) -> String {
    format!(r"(?:{max}°\s?00{MINUTES}|{deg}°\s?[0-5][0-9](?:\.[0-9]{{1,6}})?{MINUTES})")
}

fn sexagesimal(deg: &str, max: &str, hemispheres: &str) -> String {
    let body = format!("(?:{}|{})", dms(deg, max), dm(deg, max));
    format!(r"(?:{SIGN}|[{hemispheres}]\s){body}|{body}\s?[{hemispheres}]")
}

fn lat_dec() -> String {
    r"(?:90(?:\.0{1,8})?|[0-8]?[0-9](?:\.[0-9]{1,8})?)".to_string()
}

fn lon_dec() -> String {
    format!(r"(?:180(?:\.0{{1,8}})?|{LON_DEG}(?:\.[0-9]{{1,8}})?)")
}

fn decimal(value: &str, hemispheres: &str) -> String {
    format!(r"(?:{SIGN}|[{hemispheres}]\s)?{value}°?|{value}°?\s?[{hemispheres}]")
}

/// ISO 6709 component: whole degrees followed by an optional minutes and
/// seconds run, then an optional fraction.
fn iso6709(max: &str, deg: &str) -> String {
    format!(
        r"{SIGN}(?:{max}(?:\.0{{1,8}}|00(?:\.0{{1,6}})?|0000(?:\.0{{1,4}})?)?|{deg}(?:\.[0-9]{{1,8}}|[0-5][0-9](?:\.[0-9]{{1,6}})?|(?:[0-5][0-9]){{2}}(?:\.[0-9]{{1,4}})?)?)"
    )
}

const ISO_LAT_DEG: &str = "[0-8][0-9]";
const ISO_LON_DEG: &str = "(?:1[0-7][0-9]|0[0-9]{2})";

/// ISO 6709 pair; both halves carry the same precision.
fn iso6709_pair() -> String {
    let degrees = format!(
        r"(?:90(?:\.0{{1,8}})?|{ISO_LAT_DEG}(?:\.[0-9]{{1,8}})?){SIGN}(?:180(?:\.0{{1,8}})?|{ISO_LON_DEG}(?:\.[0-9]{{1,8}})?)"
    );
    let minutes = format!(
        r"(?:9000(?:\.0{{1,6}})?|{ISO_LAT_DEG}[0-5][0-9](?:\.[0-9]{{1,6}})?){SIGN}(?:18000(?:\.0{{1,6}})?|{ISO_LON_DEG}[0-5][0-9](?:\.[0-9]{{1,6}})?)"
    );
    let seconds = format!(
        r"(?:900000(?:\.0{{1,4}})?|{ISO_LAT_DEG}(?:[0-5][0-9]){{2}}(?:\.[0-9]{{1,4}})?){SIGN}(?:1800000(?:\.0{{1,4}})?|{ISO_LON_DEG}(?:[0-5][0-9]){{2}}(?:\.[0-9]{{1,4}})?)"
    );
    format!("{SIGN}(?:{degrees}|{minutes}|{seconds})")
}

/// Unanchored patterns for every coordinate test.
pub fn patterns() -> Vec<(NamedTest, String)> {
    let lat = sexagesimal(LAT_DEG, "90", "NS");
    let lon = sexagesimal(LON_DEG, "180", "EW");
    let lat_dec = decimal(&lat_dec(), "NS");
    let lon_dec = decimal(&lon_dec(), "EW");
    vec![
        (NamedTest::Lat, lat.clone()),
        (NamedTest::Lon, lon.clone()),
        (
            NamedTest::LatLon,
            format!("(?:{lat}){PAIR_SEPARATOR}(?:{lon})"),
        ),
        (NamedTest::LatDec, lat_dec.clone()),
        (NamedTest::LonDec, lon_dec.clone()),
        (
            NamedTest::LatLonDec,
            format!(r"(?:{lat_dec})[,;]?\s(?:{lon_dec})"),
        ),
        (NamedTest::Lat6709, iso6709("90", ISO_LAT_DEG)),
        (NamedTest::Lon6709, iso6709("180", ISO_LON_DEG)),
        (NamedTest::LatLon6709, iso6709_pair()),
    ]
}
