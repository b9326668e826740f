// src/probes/phone.rs
use crate::classifier::is_phone;
use crate::probes::{Probe, ProbeContext};
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use crate::utils::strip_phone_formatting;
use async_trait::async_trait;

/// Calling codes, matched longest prefix first.
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("1", "United States / Canada"),
    ("7", "Russia / Kazakhstan"),
    ("20", "Egypt"),
    ("27", "South Africa"),
    ("30", "Greece"),
    ("31", "Netherlands"),
    ("32", "Belgium"),
    ("33", "France"),
    ("34", "Spain"),
    ("36", "Hungary"),
    ("39", "Italy"),
    ("40", "Romania"),
    ("41", "Switzerland"),
    ("43", "Austria"),
    ("44", "United Kingdom"),
    ("45", "Denmark"),
    ("46", "Sweden"),
    ("47", "Norway"),
    ("48", "Poland"),
    ("49", "Germany"),
    ("51", "Peru"),
    ("52", "Mexico"),
    ("54", "Argentina"),
    ("55", "Brazil"),
    ("56", "Chile"),
    ("57", "Colombia"),
    ("58", "Venezuela"),
    ("60", "Malaysia"),
    ("61", "Australia"),
    ("62", "Indonesia"),
    ("63", "Philippines"),
    ("64", "New Zealand"),
    ("65", "Singapore"),
    ("66", "Thailand"),
    ("81", "Japan"),
    ("82", "South Korea"),
    ("84", "Vietnam"),
    ("86", "China"),
    ("90", "Turkey"),
    ("91", "India"),
    ("92", "Pakistan"),
    ("93", "Afghanistan"),
    ("94", "Sri Lanka"),
    ("98", "Iran"),
    ("212", "Morocco"),
    ("213", "Algeria"),
    ("216", "Tunisia"),
    ("233", "Ghana"),
    ("234", "Nigeria"),
    ("254", "Kenya"),
    ("255", "Tanzania"),
    ("256", "Uganda"),
    ("351", "Portugal"),
    ("352", "Luxembourg"),
    ("353", "Ireland"),
    ("354", "Iceland"),
    ("358", "Finland"),
    ("380", "Ukraine"),
    ("420", "Czech Republic"),
    ("852", "Hong Kong"),
    ("880", "Bangladesh"),
    ("886", "Taiwan"),
    ("961", "Lebanon"),
    ("962", "Jordan"),
    ("965", "Kuwait"),
    ("966", "Saudi Arabia"),
    ("971", "United Arab Emirates"),
    ("972", "Israel"),
    ("974", "Qatar"),
];

/// `+digits` form, or `None` if the input is not phone-shaped.
pub fn normalize(input: &str) -> Option<String> {
    if !is_phone(input) {
        return None;
    }
    let stripped = strip_phone_formatting(input);
    Some(if stripped.starts_with('+') {
        stripped
    } else {
        format!("+{}", stripped)
    })
}

/// Longest calling-code prefix of a number given with a leading `+`.
pub fn lookup_country(number: &str) -> Option<(&'static str, &'static str)> {
    let digits = number.strip_prefix('+')?;
    (1..=3)
        .rev()
        .filter(|len| digits.len() > *len)
        .find_map(|len| {
            let prefix = &digits[..len];
            COUNTRY_CODES.iter().find(|(code, _)| *code == prefix).copied()
        })
}

#[derive(Debug, Clone)]
pub struct PhoneFormatProbe {
    name: String,
}

impl PhoneFormatProbe {
    pub fn new() -> Self {
        Self {
            name: "Phone Format".to_string(),
        }
    }
}

#[async_trait]
impl Probe for PhoneFormatProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Phone,
            uses_network: false,
        }
    }

    async fn run(&self, number: &str, _ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        match normalize(number) {
            Some(normalized) => {
                let digits = normalized.len() - 1;
                Ok(ProbeResult::success(
                    &self.name,
                    format!("E.164: {} ({} digits)", normalized, digits),
                    None,
                ))
            }
            None => Ok(ProbeResult::error(&self.name, "Not a valid E.164 number", None)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CountryCodeProbe {
    name: String,
}

impl CountryCodeProbe {
    pub fn new() -> Self {
        Self {
            name: "Country Code".to_string(),
        }
    }
}

#[async_trait]
impl Probe for CountryCodeProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Phone,
            uses_network: false,
        }
    }

    async fn run(&self, number: &str, _ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let stripped = strip_phone_formatting(number);
        if !stripped.starts_with('+') {
            return Ok(ProbeResult::warning(
                &self.name,
                "No international prefix, country unknown",
                None,
            ));
        }

        let Some(number) = normalize(number) else {
            return Ok(ProbeResult::error(&self.name, "Not a valid E.164 number", None));
        };

        match lookup_country(&number) {
            Some((code, country)) => Ok(ProbeResult::success(
                &self.name,
                format!("+{} {}", code, country),
                None,
            )),
            None => Ok(ProbeResult::warning(&self.name, "Unknown country code", None)),
        }
    }
}
