// ── IPv4 dotted-quad validation ──

/// Returns `true` if `candidate` is a dotted-quad IPv4 address.
///
/// Each octet is one to three ASCII digits with a value of at most 255.
/// Zero-padded octets such as `010` are accepted, matching what terminal
/// settings screens typically allow; [`std::net::Ipv4Addr`] parsing is
/// stricter and rejects them.
// Octet grammar: `25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?`. Do not swap in `Ipv4Addr::from_str`.
pub fn is_valid_ipv4(candidate: &str) -> bool {
    let mut octets = 0;
    for part in candidate.split('.') {
        octets += 1;
        if octets > 4 || part.is_empty() || part.len() > 3 {
            return false;
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(value) if value <= 255 => {}
            _ => return false,
        }
    }
    octets == 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("255.255.255.255"));
    }

    #[test]
    fn accepts_zero_padded_octets() {
        assert!(is_valid_ipv4("192.168.001.010"));
        assert!("192.168.001.010".parse::<std::net::Ipv4Addr>().is_err());
    }

    #[test]
    fn rejects_out_of_range_octet() {
        assert!(!is_valid_ipv4("192.168.1.256"));
        assert!(!is_valid_ipv4("300.1.1.1"));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(!is_valid_ipv4("not.an.ip"));
        assert!(!is_valid_ipv4("192.168.1.a"));
        assert!(!is_valid_ipv4("+1.2.3.4"));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(!is_valid_ipv4(""));
        assert!(!is_valid_ipv4("192.168.1"));
        assert!(!is_valid_ipv4("192.168.1.1.1"));
        assert!(!is_valid_ipv4("192..1.1"));
        assert!(!is_valid_ipv4("1921.168.1.1"));
        assert!(!is_valid_ipv4(" 192.168.1.1"));
    }
}
