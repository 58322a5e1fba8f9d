//! Conversions between idiomatic (camelCase) and wire-format (PascalCase) names.

/// Convert an idiomatic property name to its wire-format spelling.
///
/// Only the first character changes: `entityTypes` becomes `EntityTypes`.
pub fn to_pascal_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Convert a wire-format property name to its idiomatic spelling.
///
/// A leading run of capitals is treated as an acronym and lowered as a whole,
/// except for its last letter when that letter starts the next word:
/// `VPCId` becomes `vpcId`, `S3Location` becomes `s3Location`.
pub fn to_camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() && !chars[i].is_lowercase() {
        let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());
        if i > 0 && next_is_lower {
            break;
        }
        result.extend(chars[i].to_lowercase());
        i += 1;
    }

    result.extend(&chars[i..]);
    result
}
