//! Free-text channel extraction.
//!
//! A node's description is loosely formatted human text ("Port 1: 144.950MHz
//! 1200 baud | BBS on 70cm"). This module segments the text into chunks so a
//! baud token binds to a nearby frequency token, converts units, and filters
//! out lookalikes such as software version numbers.

use std::collections::HashSet;

use regex::Regex;

use pktmap_core::ChannelRecord;

/// Plausible band for an amateur packet channel, in MHz. Converted values
/// outside this range are treated as non-frequencies (version numbers,
/// unit-less junk) and never emitted.
pub const FREQ_MHZ_MIN: f64 = 0.5;
pub const FREQ_MHZ_MAX: f64 = 500.0;

/// Modulation/mode/band words that mark a chunk as radio context, allowing
/// bare decimal numbers in that chunk to be read as MHz.
const RADIO_CONTEXT: &str =
    r"\b(?:afsk|fsk|bpsk|qpsk|il2p|fx25|ax25|aprs|vara|ardop|fm|usb|lsb|vhf|uhf|hf)\b";

/// Extract `(frequency, baud)` channel records from a node's description.
///
/// Markup is stripped and the text lower-cased, then split into chunks on the
/// word "port", the separator `" - "`, and `|`. Within each chunk a baud
/// token is searched (unit-suffixed number first, then the `Nk M` shorthand),
/// frequencies with an explicit `mhz`/`khz` unit are converted and collected,
/// and bare decimals are accepted only when the chunk names radio context and
/// no unit-bearing match was present. Results are de-duplicated on
/// `(freq, baud)` keeping first-seen order.
///
/// Malformed or empty input yields an empty vector, never an error.
#[must_use]
pub fn extract_channels(text: &str) -> Vec<ChannelRecord> {
    let plain = strip_html(text).to_lowercase();

    let chunk_re = Regex::new(r"\bport\b|\s-\s|\|").expect("valid regex");
    let unit_re = Regex::new(r"\b(\d{1,5}[.,]\d{1,6})\s*(mhz|khz)\b").expect("valid regex");
    let bare_re = Regex::new(r"\b\d{1,3}[.,]\d{1,6}\b").expect("valid regex");
    let context_re = Regex::new(RADIO_CONTEXT).expect("valid regex");

    let mut channels: Vec<ChannelRecord> = Vec::new();

    for chunk in chunk_re.split(&plain) {
        let baud = baud_in(chunk);

        let mut saw_unit_match = false;
        for caps in unit_re.captures_iter(chunk) {
            saw_unit_match = true;
            let number = &caps[1];
            let Some(mhz) = parse_mhz(number, &caps[2] == "khz") else {
                continue;
            };
            channels.push(ChannelRecord {
                freq: fmt_mhz(mhz),
                baud: baud.clone(),
                raw: caps[0].to_string(),
            });
        }

        // Bare numbers like "144.9375" are only trusted when the chunk talks
        // about radio at all; otherwise "v2.1" style decimals sneak in.
        if !saw_unit_match && context_re.is_match(chunk) {
            for m in bare_re.find_iter(chunk) {
                // A dot right before or after the match means this is a
                // fragment of a dotted version string like "6.0.25.16".
                let before = chunk[..m.start()].chars().next_back();
                let after = chunk[m.end()..].chars().next();
                if before == Some('.') || after == Some('.') {
                    continue;
                }
                let Some(mhz) = parse_mhz(m.as_str(), false) else {
                    continue;
                };
                channels.push(ChannelRecord {
                    freq: fmt_mhz(mhz),
                    baud: baud.clone(),
                    raw: m.as_str().to_string(),
                });
            }
        }
    }

    dedup_channels(channels)
}

/// Best-effort primary pair for an item: the first channel with both fields,
/// else the first with a frequency, else empty strings.
#[must_use]
pub fn primary_channel(channels: &[ChannelRecord]) -> (String, String) {
    channels
        .iter()
        .find(|c| !c.freq.is_empty() && !c.baud.is_empty())
        .or_else(|| channels.iter().find(|c| !c.freq.is_empty()))
        .map_or_else(
            || (String::new(), String::new()),
            |c| (c.freq.clone(), c.baud.clone()),
        )
}

/// Remove markup (anything between angle brackets) and collapse whitespace.
#[must_use]
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let tag_re = Regex::new(r"<[^>]+>").expect("valid regex");
    let without_tags = tag_re.replace_all(text, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull at most one baud value out of a chunk.
///
/// A unit-suffixed number ("1200 baud", "9600bd", "300bps") wins over the
/// shorthand form ("1k2" = 1200, "9k6" = 9600).
fn baud_in(chunk: &str) -> String {
    let unit_re = Regex::new(r"\b(\d{2,5})\s*(?:baud|bd|bps|b/s)\b").expect("valid regex");
    if let Some(caps) = unit_re.captures(chunk) {
        return caps[1].to_string();
    }
    let shorthand_re = Regex::new(r"\b(\d{1,2})k(\d)\b").expect("valid regex");
    if let Some(caps) = shorthand_re.captures(chunk) {
        let thousands: u32 = caps[1].parse().unwrap_or(0);
        let hundreds: u32 = caps[2].parse().unwrap_or(0);
        return (thousands * 1000 + hundreds * 100).to_string();
    }
    String::new()
}

/// Parse a numeric token (comma or dot decimal separator) into MHz, applying
/// the plausibility band. `None` means the token is not a usable frequency.
fn parse_mhz(raw: &str, is_khz: bool) -> Option<f64> {
    let normalised = raw.trim().replace(',', ".");
    let mut value: f64 = normalised.parse().ok()?;
    if is_khz {
        value /= 1000.0;
    }
    (FREQ_MHZ_MIN..=FREQ_MHZ_MAX)
        .contains(&value)
        .then_some(value)
}

/// Format MHz with up to 6 decimals, trimming trailing zeros and the point.
fn fmt_mhz(value: f64) -> String {
    format!("{value:.6}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn dedup_channels(channels: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    channels
        .into_iter()
        .filter(|c| seen.insert((c.freq.clone(), c.baud.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freqs(channels: &[ChannelRecord]) -> Vec<(&str, &str)> {
        channels
            .iter()
            .map(|c| (c.freq.as_str(), c.baud.as_str()))
            .collect()
    }

    #[test]
    fn digit_free_text_yields_nothing() {
        assert!(extract_channels("").is_empty());
        assert!(extract_channels("VHF node near the coast").is_empty());
        assert!(extract_channels("<b>BBS and mailbox</b>").is_empty());
    }

    #[test]
    fn pairs_baud_with_frequency_per_port_chunk() {
        let channels =
            extract_channels("Port 1: 144.950MHz 1200 baud - Port 2: 432.500MHz 9600bd");
        assert_eq!(
            freqs(&channels),
            vec![("144.95", "1200"), ("432.5", "9600")],
            "each port's baud must bind to its own frequency, in order"
        );
    }

    #[test]
    fn rejects_software_version_numbers() {
        assert!(extract_channels("LINBPQ 6.0.25.16").is_empty());
        // Even with radio context in the chunk, dotted fragments are skipped.
        assert!(extract_channels("ax25 stack LINBPQ 6.0.25.16").is_empty());
    }

    #[test]
    fn converts_khz_to_mhz_without_spurious_baud() {
        let channels = extract_channels("7052.75kHz USB");
        assert_eq!(freqs(&channels), vec![("7.05275", "")]);
        assert_eq!(channels[0].raw, "7052.75khz");
    }

    #[test]
    fn dedup_is_idempotent_across_repeats() {
        let channels = extract_channels("144.950MHz 1200 baud | 144.950MHz 1200bps | 144,950MHz 1200bd");
        assert_eq!(freqs(&channels), vec![("144.95", "1200")]);
    }

    #[test]
    fn same_frequency_with_different_baud_is_distinct() {
        let channels = extract_channels("Port 1 144.950MHz 1200 baud | Port 2 144.950MHz 9600 baud");
        assert_eq!(
            freqs(&channels),
            vec![("144.95", "1200"), ("144.95", "9600")]
        );
    }

    #[test]
    fn shorthand_baud_expands() {
        let channels = extract_channels("Port 4 430.6250MHz 9k6");
        assert_eq!(freqs(&channels), vec![("430.625", "9600")]);

        let channels = extract_channels("1k2 afsk on 144.8500MHz");
        assert_eq!(freqs(&channels), vec![("144.85", "1200")]);
    }

    #[test]
    fn unit_suffixed_baud_beats_shorthand() {
        let channels = extract_channels("144.950MHz 300bps (1k2 later)");
        assert_eq!(freqs(&channels), vec![("144.95", "300")]);
    }

    #[test]
    fn bare_numbers_need_radio_context() {
        assert!(
            extract_channels("last seen 144.95 by the gateway").is_empty(),
            "no context keyword, bare decimal must be ignored"
        );
        let channels = extract_channels("aprs digi on 144.8");
        assert_eq!(freqs(&channels), vec![("144.8", "")]);
    }

    #[test]
    fn implausible_values_are_filtered() {
        // 0.25 MHz and 700 MHz fall outside the plausible band.
        assert!(extract_channels("250.0kHz fm beacon").is_empty());
        assert!(extract_channels("700.5MHz link").is_empty());
        // Band edges are inclusive.
        let channels = extract_channels("500.0MHz uhf | 0.5MHz hf");
        assert_eq!(freqs(&channels), vec![("500", ""), ("0.5", "")]);
    }

    #[test]
    fn markup_is_stripped_before_matching() {
        let channels = extract_channels("<b>Port 1</b><br>144.9625MHz<i>1200 baud</i>");
        assert_eq!(freqs(&channels), vec![("144.9625", "1200")]);
    }

    #[test]
    fn comma_decimal_separator_is_accepted() {
        let channels = extract_channels("Port 1 438,1000MHz 1200 baud");
        assert_eq!(freqs(&channels), vec![("438.1", "1200")]);
    }

    #[test]
    fn strip_html_collapses_whitespace() {
        assert_eq!(strip_html("<p>a</p>\n  <p>b</p>"), "a b");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn primary_prefers_complete_pair() {
        let channels = extract_channels("kiss tnc fm 430.925 - Port 2 144.925MHz 1200 baud");
        let (freq, baud) = primary_channel(&channels);
        assert_eq!((freq.as_str(), baud.as_str()), ("144.925", "1200"));
    }

    #[test]
    fn primary_falls_back_to_first_frequency_then_empty() {
        let channels = extract_channels("fm voice 145.500");
        assert_eq!(primary_channel(&channels).0, "145.5");
        assert_eq!(primary_channel(&[]), (String::new(), String::new()));
    }
}
