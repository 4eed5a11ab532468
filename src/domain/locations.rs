//! Closed lookup table of states and the cities offered for each of them.

use crate::domain::types::TypeConstraintError;

const STATES_AND_CITIES: &[(&str, &[&str])] = &[
    ("Andhra Pradesh", &["Visakhapatnam", "Vijayawada", "Guntur", "Tirupati"]),
    ("Arunachal Pradesh", &["Itanagar", "Tawang", "Ziro", "Pasighat"]),
    ("Assam", &["Guwahati", "Dibrugarh", "Jorhat", "Silchar"]),
    ("Bihar", &["Patna", "Gaya", "Bhagalpur", "Muzaffarpur"]),
    ("Chhattisgarh", &["Raipur", "Bilaspur", "Durg", "Korba"]),
    ("Goa", &["Panaji", "Margao", "Vasco da Gama", "Mapusa"]),
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot"]),
    ("Haryana", &["Gurgaon", "Faridabad", "Panipat", "Ambala"]),
    ("Himachal Pradesh", &["Shimla", "Manali", "Dharamshala", "Mandi"]),
    ("Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro"]),
    ("Karnataka", &["Bengaluru", "Mysuru", "Mangaluru", "Hubballi"]),
    ("Kerala", &["Thiruvananthapuram", "Kochi", "Kozhikode", "Kannur"]),
    ("Madhya Pradesh", &["Bhopal", "Indore", "Gwalior", "Jabalpur"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Nashik"]),
    ("Manipur", &["Imphal", "Churachandpur", "Thoubal", "Bishnupur"]),
    ("Meghalaya", &["Shillong", "Tura", "Nongpoh", "Cherrapunjee"]),
    ("Mizoram", &["Aizawl", "Lunglei", "Champhai", "Serchhip"]),
    ("Nagaland", &["Kohima", "Dimapur", "Mokokchung", "Tuensang"]),
    ("Odisha", &["Bhubaneswar", "Cuttack", "Rourkela", "Puri"]),
    ("Punjab", &["Amritsar", "Mohali", "Ludhiana", "Patiala", "Jalandhar"]),
    ("Rajasthan", &["Jaipur", "Udaipur", "Jodhpur", "Kota"]),
    ("Sikkim", &["Gangtok", "Namchi", "Pelling", "Geyzing"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai", "Tiruchirappalli"]),
    ("Telangana", &["Hyderabad", "Warangal", "Nizamabad", "Karimnagar"]),
    ("Tripura", &["Agartala", "Udaipur", "Dharmanagar", "Kailashahar"]),
    (
        "Uttar Pradesh",
        &[
            "Lucknow",
            "Kanpur",
            "Varanasi",
            "Agra",
            "Allahabad",
            "Ghaziabad",
            "Noida",
            "Meerut",
            "Aligarh",
            "Bareilly",
            "Badaun",
        ],
    ),
    ("Uttarakhand", &["Dehradun", "Haridwar", "Nainital", "Rishikesh"]),
    ("West Bengal", &["Kolkata", "Darjeeling", "Siliguri", "Howrah"]),
    (
        "Andaman and Nicobar Islands",
        &["Port Blair", "Havelock Island", "Diglipur"],
    ),
    ("Chandigarh", &["Chandigarh"]),
    (
        "Dadra and Nagar Haveli and Daman and Diu",
        &["Daman", "Diu", "Silvassa"],
    ),
    ("Delhi", &["New Delhi"]),
    ("Jammu and Kashmir", &["Srinagar", "Jammu", "Anantnag", "Baramulla"]),
    ("Ladakh", &["Leh", "Kargil"]),
    ("Lakshadweep", &["Kavaratti", "Agatti", "Minicoy"]),
    ("Puducherry", &["Puducherry", "Karaikal", "Mahe", "Yanam"]),
];

/// All known states in display order.
pub fn states() -> impl Iterator<Item = &'static str> {
    STATES_AND_CITIES.iter().map(|(state, _)| *state)
}

/// Cities offered for `state`, or `None` when the state is unknown.
pub fn cities_for(state: &str) -> Option<&'static [&'static str]> {
    STATES_AND_CITIES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(state.trim()))
        .map(|(_, cities)| *cities)
}

/// Resolves a `(state, city)` pair to its canonical spelling.
pub fn resolve_location(
    state: &str,
    city: &str,
) -> Result<(&'static str, &'static str), TypeConstraintError> {
    let (canonical_state, cities) = STATES_AND_CITIES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(state.trim()))
        .ok_or_else(|| TypeConstraintError::UnknownState(state.trim().to_string()))?;

    let canonical_city = cities
        .iter()
        .find(|known| known.eq_ignore_ascii_case(city.trim()))
        .ok_or_else(|| TypeConstraintError::CityNotInState {
            city: city.trim().to_string(),
            state: (*canonical_state).to_string(),
        })?;

    Ok((*canonical_state, *canonical_city))
}
