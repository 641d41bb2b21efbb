// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// (name, ISO 3166-1 alpha-2)
pub static COUNTRIES: &[(&str, &str)] = &[
    ("Albania", "AL"),
    ("Andorra", "AD"),
    ("Argentina", "AR"),
    ("Armenia", "AM"),
    ("Australia", "AU"),
    ("Austria", "AT"),
    ("Azerbaijan", "AZ"),
    ("Belarus", "BY"),
    ("Belgium", "BE"),
    ("Bosnia and Herzegovina", "BA"),
    ("Brazil", "BR"),
    ("Bulgaria", "BG"),
    ("Canada", "CA"),
    ("Chile", "CL"),
    ("China", "CN"),
    ("Colombia", "CO"),
    ("Croatia", "HR"),
    ("Cuba", "CU"),
    ("Cyprus", "CY"),
    ("Czech Republic", "CZ"),
    ("Denmark", "DK"),
    ("Egypt", "EG"),
    ("England", "GB"),
    ("Estonia", "EE"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("Georgia", "GE"),
    ("Germany", "DE"),
    ("Greece", "GR"),
    ("Hungary", "HU"),
    ("Iceland", "IS"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Iran", "IR"),
    ("Ireland", "IE"),
    ("Israel", "IL"),
    ("Italy", "IT"),
    ("Japan", "JP"),
    ("Kazakhstan", "KZ"),
    ("Kosovo", "XK"),
    ("Latvia", "LV"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Malta", "MT"),
    ("Mexico", "MX"),
    ("Moldova", "MD"),
    ("Monaco", "MC"),
    ("Mongolia", "MN"),
    ("Montenegro", "ME"),
    ("Netherlands", "NL"),
    ("North Macedonia", "MK"),
    ("Norway", "NO"),
    ("Peru", "PE"),
    ("Philippines", "PH"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Qatar", "QA"),
    ("Romania", "RO"),
    ("Russia", "RU"),
    ("Saudi Arabia", "SA"),
    ("Scotland", "GB"),
    ("Serbia", "RS"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("South Africa", "ZA"),
    ("Spain", "ES"),
    ("Sweden", "SE"),
    ("Switzerland", "CH"),
    ("Turkey", "TR"),
    ("Ukraine", "UA"),
    ("United Arab Emirates", "AE"),
    ("United Kingdom", "GB"),
    ("United States", "US"),
    ("Uzbekistan", "UZ"),
    ("Vietnam", "VN"),
];

/// Case-insensitive exact match, returning the listed spelling.
pub fn canonical(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    COUNTRIES
        .iter()
        .find(|(n, _)| n.to_lowercase() == needle)
        .map(|(n, _)| *n)
}

pub fn code_for(name: &str) -> Option<&'static str> {
    let c = canonical(name)?;
    COUNTRIES.iter().find(|(n, _)| *n == c).map(|(_, code)| *code)
}

/// Names starting with `prefix`, for "did you mean" hints.
pub fn suggest(prefix: &str) -> Vec<&'static str> {
    let p = prefix.trim().to_lowercase();
    if p.is_empty() {
        return Vec::new();
    }
    COUNTRIES
        .iter()
        .filter(|(n, _)| n.to_lowercase().starts_with(&p))
        .map(|(n, _)| *n)
        .collect()
}
