use std::collections::HashMap;

/// Maps a location name to the stable numeric code stored in `LocationHash`.
pub trait LocationCodes: Send + Sync {
    fn code(&self, location: &str) -> Option<i64>;
}

/// Weather stations known to the prediction model, in code order.
pub const AUSTRALIAN_STATIONS: [&str; 49] = [
    "Albury",
    "BadgerysCreek",
    "Cobar",
    "CoffsHarbour",
    "Moree",
    "Newcastle",
    "NorahHead",
    "NorfolkIsland",
    "Penrith",
    "Richmond",
    "Sydney",
    "SydneyAirport",
    "WaggaWagga",
    "Williamtown",
    "Wollongong",
    "Canberra",
    "Tuggeranong",
    "MountGinini",
    "Ballarat",
    "Bendigo",
    "Sale",
    "MelbourneAirport",
    "Melbourne",
    "Mildura",
    "Nhil",
    "Portland",
    "Watsonia",
    "Dartmoor",
    "Brisbane",
    "Cairns",
    "GoldCoast",
    "Townsville",
    "Adelaide",
    "MountGambier",
    "Nuriootpa",
    "Woomera",
    "Albany",
    "Witchcliffe",
    "PearceRAAF",
    "PerthAirport",
    "Perth",
    "SalmonGums",
    "Walpole",
    "Hobart",
    "Launceston",
    "AliceSprings",
    "Darwin",
    "Katherine",
    "Uluru",
];

/// Fixed name-to-index table.
#[derive(Debug, Clone)]
pub struct StationTable {
    codes: HashMap<String, i64>,
}

impl StationTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.into(), i as i64))
            .collect();
        Self { codes }
    }

    pub fn australian() -> Self {
        Self::new(AUSTRALIAN_STATIONS)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for StationTable {
    fn default() -> Self {
        Self::australian()
    }
}

impl LocationCodes for StationTable {
    fn code(&self, location: &str) -> Option<i64> {
        self.codes.get(location).copied()
    }
}
