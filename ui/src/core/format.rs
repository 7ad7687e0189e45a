//! Formatting helpers for presenting the summary value.

/// Host-provided number formatting (spreadsheet-style format strings).
pub trait ValueFormatter {
    fn format_value(&self, value: f64, format: Option<&str>) -> String;
}

/// Format the aggregated value for display. Delegates to the host formatter when
/// one is injected, otherwise falls back to en-US grouping with two decimals.
pub fn format_summary(value: f64, format: Option<&str>, host: Option<&dyn ValueFormatter>) -> String {
    match host {
        Some(formatter) => formatter.format_value(value, format),
        None => format_number(value, 2),
    }
}

/// en-US style: thousands separators and exactly `decimals` fractional digits.
pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = round_to(value.abs(), decimals);
    let digits = format!("{rounded:.decimals$}");
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    let mut out = String::new();
    if value < 0.0 && digits.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10_f64.powi(decimals.min(15) as i32);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Built-in formatter for the common spreadsheet-style patterns:
/// `0`, `0.00`, `#,##0.00`, `$#,##0`, `0.0%`, `0.00,,"M"` and quoted or
/// backslash-escaped literals around the number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFormatter;

impl ValueFormatter for PatternFormatter {
    fn format_value(&self, value: f64, format: Option<&str>) -> String {
        match format.map(str::trim).filter(|f| !f.is_empty()) {
            Some(pattern) => NumberPattern::parse(pattern).apply(value),
            None => format_number(value, 2),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct NumberPattern {
    prefix: String,
    suffix: String,
    min_int_digits: usize,
    min_frac_digits: usize,
    max_frac_digits: usize,
    grouping: bool,
    thousands_scale: i32,
    percent: bool,
    has_number: bool,
}

impl NumberPattern {
    fn parse(pattern: &str) -> Self {
        let mut parsed = NumberPattern::default();
        let mut chars = pattern.chars().peekable();
        let mut in_fraction = false;
        let mut pending_commas = 0;
        let mut number_done = false;

        while let Some(ch) = chars.next() {
            let literal = match ch {
                '"' => {
                    let mut quoted = String::new();
                    for c in chars.by_ref() {
                        if c == '"' {
                            break;
                        }
                        quoted.push(c);
                    }
                    Some(quoted)
                }
                '\\' => chars.next().map(String::from),
                '0' | '#' if !number_done => {
                    parsed.has_number = true;
                    if pending_commas > 0 && !in_fraction {
                        parsed.grouping = true;
                    }
                    pending_commas = 0;
                    match (in_fraction, ch) {
                        (false, '0') => parsed.min_int_digits += 1,
                        (false, _) => {}
                        (true, '0') => {
                            parsed.min_frac_digits += 1;
                            parsed.max_frac_digits += 1;
                        }
                        (true, _) => parsed.max_frac_digits += 1,
                    }
                    None
                }
                ',' if parsed.has_number && !number_done => {
                    pending_commas += 1;
                    None
                }
                '.' if parsed.has_number && !in_fraction && !number_done => {
                    if pending_commas > 0 {
                        parsed.grouping = true;
                        pending_commas = 0;
                    }
                    in_fraction = true;
                    None
                }
                '%' => {
                    parsed.percent = true;
                    Some("%".to_string())
                }
                other => Some(other.to_string()),
            };

            if let Some(text) = literal {
                if parsed.has_number {
                    number_done = true;
                    parsed.suffix.push_str(&text);
                } else {
                    parsed.prefix.push_str(&text);
                }
            }

            // Commas trailing the digit placeholders scale by thousands.
            if pending_commas > 0 && !matches!(chars.peek(), Some('0' | '#' | ',' | '.')) {
                parsed.thousands_scale += pending_commas;
                pending_commas = 0;
            }
        }

        parsed
    }

    fn apply(&self, value: f64) -> String {
        if !self.has_number {
            return format!("{}{}", self.prefix, self.suffix);
        }
        if !value.is_finite() {
            return format_number(value, 0);
        }

        let mut scaled = value;
        if self.percent {
            scaled *= 100.0;
        }
        if self.thousands_scale > 0 {
            scaled /= 1000_f64.powi(self.thousands_scale);
        }

        let rounded = round_to(scaled.abs(), self.max_frac_digits);
        let max = self.max_frac_digits;
        let digits = format!("{rounded:.max$}");
        let (int_raw, frac_raw) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut frac = frac_raw.to_string();
        while frac.len() > self.min_frac_digits && frac.ends_with('0') {
            frac.pop();
        }

        let mut int_part = int_raw.trim_start_matches('0').to_string();
        while int_part.len() < self.min_int_digits {
            int_part.insert(0, '0');
        }
        if self.grouping {
            int_part = group_thousands(&int_part);
        }

        let negative = value < 0.0 && digits.bytes().any(|b| matches!(b, b'1'..=b'9'));

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        out.push_str(&int_part);
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        out.push_str(&self.suffix);
        out
    }
}
