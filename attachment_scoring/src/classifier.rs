use crate::config::*;

/// Picks the dimension with the highest sum.
///
/// Ties go to the first dimension in the order secure, avoidant, ambivalent.
pub fn classify(secure: u32, avoidant: u32, ambivalent: u32) -> Classification {
    let ordered: [(Classification, u32); 3] = [
        (Classification::Secure, secure),
        (Classification::Avoidant, avoidant),
        (Classification::Ambivalent, ambivalent),
    ];
    let max_val = secure.max(avoidant).max(ambivalent);
    ordered
        .iter()
        .find(|(_, v)| *v == max_val)
        .map(|(c, _)| *c)
        // The maximum is always one of the values.
        .unwrap_or(Classification::Secure)
}

/// Classifies a respondent according to the missing value policy.
pub fn classify_sums(sums: &DimensionSums, policy: MissingValuePolicy) -> Option<Classification> {
    match policy {
        MissingValuePolicy::RequireAnswers
            if Classification::PRIORITY
                .iter()
                .any(|c| sums.answered(*c) == 0) =>
        {
            None
        }
        _ => Some(classify(sums.secure, sums.avoidant, sums.ambivalent)),
    }
}
