/// Floor labels of the building, topmost first. Index 0 is the top floor.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct FloorOrder {
    floors: Vec<String>,
}

impl FloorOrder {
    pub fn new(floors: Vec<String>) -> Self {
        FloorOrder { floors }
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.floors.get(index).map(String::as_str)
    }

    pub fn index_of(&self, floor: &str) -> Option<usize> {
        self.floors.iter().position(|f| f == floor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.floors.iter().map(String::as_str)
    }

    /// Sorts `floors` top to bottom. Unknown labels sort last.
    pub fn sort(&self, floors: &mut [String]) {
        floors.sort_by_key(|floor| self.index_of(floor).unwrap_or(usize::MAX));
    }
}
