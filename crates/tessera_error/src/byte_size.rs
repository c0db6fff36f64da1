//! Human readable byte counts for error messages.

const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// A byte count rendered with decimal (SI) units, e.g. `1.0 MB` or `83 MB`.
///
/// # Examples
///
/// ```
/// use tessera_error::ByteSize;
///
/// assert_eq!(ByteSize(1024 * 1024).to_string(), "1.0 MB");
/// assert_eq!(ByteSize(82_854_982).to_string(), "83 MB");
/// assert_eq!(ByteSize(7).to_string(), "7 B");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl std::fmt::Display for ByteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.0;
        if bytes < 10 {
            return write!(f, "{} B", bytes);
        }

        let mut exponent = 0usize;
        let mut scaled = bytes as f64;
        while scaled >= 1000.0 && exponent < UNITS.len() - 1 {
            scaled /= 1000.0;
            exponent += 1;
        }

        let value = (scaled * 10.0 + 0.5).floor() / 10.0;
        if value < 10.0 {
            write!(f, "{:.1} {}", value, UNITS[exponent])
        } else {
            write!(f, "{:.0} {}", value, UNITS[exponent])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_are_plain_bytes() {
        assert_eq!(ByteSize(0).to_string(), "0 B");
        assert_eq!(ByteSize(9).to_string(), "9 B");
    }

    #[test]
    fn kilobytes_keep_one_decimal_below_ten() {
        assert_eq!(ByteSize(1500).to_string(), "1.5 kB");
        assert_eq!(ByteSize(12_000).to_string(), "12 kB");
    }

    #[test]
    fn hundreds_of_bytes_are_whole() {
        assert_eq!(ByteSize(512).to_string(), "512 B");
    }
}
