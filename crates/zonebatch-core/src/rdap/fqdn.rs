use std::fmt;
use std::str::FromStr;

use super::error::LookupError;

/// Second-level domain name: exactly `<sld>.<tld>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fqdn {
    sld: String,
    tld: String,
}

impl Fqdn {
    pub fn new(sld: impl Into<String>, tld: impl Into<String>) -> Result<Self, LookupError> {
        let (sld, tld) = (sld.into(), tld.into());
        if sld.is_empty() || tld.is_empty() || sld.contains('.') || tld.contains('.') {
            return Err(LookupError::Fqdn(format!("{}.{}", sld, tld)));
        }
        Ok(Self { sld, tld })
    }

    pub fn sld(&self) -> &str {
        &self.sld
    }

    pub fn tld(&self) -> &str {
        &self.tld
    }
}

impl FromStr for Fqdn {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('.') {
            Some((sld, tld)) => Fqdn::new(sld, tld).map_err(|_| LookupError::Fqdn(s.to_string())),
            None => Err(LookupError::Fqdn(s.to_string())),
        }
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sld, self.tld)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_labels() {
        let fqdn: Fqdn = " example.com\n".parse().unwrap();
        assert_eq!(fqdn.sld(), "example");
        assert_eq!(fqdn.tld(), "com");
        assert_eq!(fqdn.to_string(), "example.com");
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["", "com", "www.example.com", ".com", "example.", "."] {
            assert!(bad.parse::<Fqdn>().is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn error_names_the_input() {
        let err = "a.b.c".parse::<Fqdn>().unwrap_err();
        assert_eq!(err.to_string(), "unexpected FQDN: \"a.b.c\"");
    }
}
