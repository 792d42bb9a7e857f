//! Static coordinates for supported cities and curated neighborhoods.

use crate::models::Coordinates;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Whether a static place is a whole city or a neighborhood within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    City,
    Neighborhood,
}

/// One entry of the static table.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    /// Display name returned to callers.
    pub display: &'static str,
    /// Lowercased spellings that resolve to this place.
    pub aliases: &'static [&'static str],
    pub kind: PlaceKind,
    pub coordinates: Coordinates,
}

const fn city(display: &'static str, aliases: &'static [&'static str], lat: f64, lon: f64) -> Place {
    Place {
        display,
        aliases,
        kind: PlaceKind::City,
        coordinates: Coordinates::new(lat, lon),
    }
}

const fn hood(display: &'static str, aliases: &'static [&'static str], lat: f64, lon: f64) -> Place {
    Place {
        display,
        aliases,
        kind: PlaceKind::Neighborhood,
        coordinates: Coordinates::new(lat, lon),
    }
}

pub static PLACES: &[Place] = &[
    city("Bangalore", &["bangalore", "bengaluru", "blr"], 12.9716, 77.5946),
    city("Mumbai", &["mumbai", "bombay"], 19.0760, 72.8777),
    city("Delhi", &["delhi", "new delhi", "ncr"], 28.6139, 77.2090),
    city("Gurgaon", &["gurgaon", "gurugram"], 28.4595, 77.0266),
    city("Noida", &["noida"], 28.5355, 77.3910),
    city("Pune", &["pune"], 18.5204, 73.8567),
    city("Hyderabad", &["hyderabad"], 17.3850, 78.4867),
    city("Chennai", &["chennai", "madras"], 13.0827, 80.2707),
    city("Kolkata", &["kolkata", "calcutta"], 22.5726, 88.3639),
    city("Goa", &["goa"], 15.2993, 74.1240),
    city("Jaipur", &["jaipur"], 26.9124, 75.7873),
    city("Ahmedabad", &["ahmedabad"], 23.0225, 72.5714),
    city("Kochi", &["kochi", "cochin"], 9.9312, 76.2673),
    city("Chandigarh", &["chandigarh"], 30.7333, 76.7794),
    hood("Koramangala, Bangalore", &["koramangala"], 12.9352, 77.6245),
    hood("Indiranagar, Bangalore", &["indiranagar", "indira nagar"], 12.9784, 77.6408),
    hood("HSR Layout, Bangalore", &["hsr layout", "hsr"], 12.9116, 77.6389),
    hood("Whitefield, Bangalore", &["whitefield"], 12.9698, 77.7500),
    hood("Jayanagar, Bangalore", &["jayanagar"], 12.9250, 77.5938),
    hood("JP Nagar, Bangalore", &["jp nagar"], 12.9063, 77.5857),
    hood("MG Road, Bangalore", &["mg road"], 12.9755, 77.6068),
    hood("Malleshwaram, Bangalore", &["malleshwaram", "malleswaram"], 13.0035, 77.5710),
    hood("BTM Layout, Bangalore", &["btm layout", "btm"], 12.9166, 77.6101),
    hood("Electronic City, Bangalore", &["electronic city"], 12.8452, 77.6602),
    hood("Marathahalli, Bangalore", &["marathahalli"], 12.9569, 77.7011),
    hood("Hebbal, Bangalore", &["hebbal"], 13.0358, 77.5970),
    hood("Bandra, Mumbai", &["bandra"], 19.0596, 72.8295),
    hood("Andheri, Mumbai", &["andheri"], 19.1136, 72.8697),
    hood("Juhu, Mumbai", &["juhu"], 19.1075, 72.8263),
    hood("Colaba, Mumbai", &["colaba"], 18.9067, 72.8147),
    hood("Lower Parel, Mumbai", &["lower parel"], 18.9977, 72.8376),
    hood("Powai, Mumbai", &["powai"], 19.1176, 72.9060),
    hood("Hauz Khas, Delhi", &["hauz khas"], 28.5494, 77.2001),
    hood("Connaught Place, Delhi", &["connaught place"], 28.6315, 77.2167),
    hood("Saket, Delhi", &["saket"], 28.5245, 77.2066),
    hood("Koregaon Park, Pune", &["koregaon park"], 18.5362, 73.8940),
    hood("Baner, Pune", &["baner"], 18.5590, 73.7868),
    hood("Banjara Hills, Hyderabad", &["banjara hills"], 17.4156, 78.4347),
    hood("Jubilee Hills, Hyderabad", &["jubilee hills"], 17.4326, 78.4071),
    hood("Gachibowli, Hyderabad", &["gachibowli"], 17.4401, 78.3489),
];

static BY_ALIAS: LazyLock<HashMap<&'static str, &'static Place>> =
    LazyLock::new(|| aliases().collect());

/// Exact lookup of a normalised (lowercased, single-spaced) phrase.
pub fn lookup(phrase: &str) -> Option<&'static Place> {
    BY_ALIAS.get(phrase).copied()
}

/// Iterates every alias with its place.
pub fn aliases() -> impl Iterator<Item = (&'static str, &'static Place)> {
    PLACES
        .iter()
        .flat_map(|place| place.aliases.iter().map(move |alias| (*alias, place)))
}
