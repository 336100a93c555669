//! Domain gate: a cheap keyword pre-filter run before any retrieval work.
//!
//! Case-insensitive substring match against a fixed vocabulary. False
//! negatives (an in-domain query using none of the listed terms) are an
//! accepted limitation; false positives only cost an extra retrieval
//! call.

/// Vocabulary of HVAC-domain terms.
///
/// Shared with the synthesizer's context-relevance check so a single
/// table defines what counts as in-domain.
pub const DOMAIN_TERMS: &[&str] = &[
    "heat pump",
    "hvac",
    "heating",
    "cooling",
    "ventilation",
    "air conditioning",
    "air conditioner",
    "refrigerant",
    "compressor",
    "condenser",
    "evaporator",
    "thermostat",
    "duct",
    "airflow",
    "air handler",
    "heat exchanger",
    "insulation",
    "defrost",
    "radiator",
    "boiler",
    "furnace",
    "humidity",
    "dehumidif",
    "seer",
    "btu",
    "split system",
    "geothermal",
    "heat load",
    "load calculation",
];

/// Whether a query is within the assistant's competence area.
pub fn is_in_domain(query: &str) -> bool {
    let query = query.to_lowercase();
    DOMAIN_TERMS.iter().any(|term| query.contains(term))
}

/// Whether a piece of retrieved or synthesized text mentions the domain.
pub fn mentions_domain(text: &str) -> bool {
    is_in_domain(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_domain_queries() {
        assert!(is_in_domain("what is a heat pump"));
        assert!(is_in_domain("How do I size DUCTWORK for a retrofit?"));
        assert!(is_in_domain("recommended SEER rating"));
        assert!(is_in_domain("balancing airflow across rooms"));
    }

    #[test]
    fn test_out_of_domain_queries() {
        assert!(!is_in_domain("what is the capital of France"));
        assert!(!is_in_domain("best pasta recipe"));
        assert!(!is_in_domain(""));
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        assert!(is_in_domain("GEOTHERMAL loops"));
        assert!(is_in_domain("dehumidification strategies"));
    }
}
