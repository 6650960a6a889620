/// Direction a rider asked for when pressing a hall button.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HallDirection {
    Up,
    Down,
}

impl HallDirection {
    pub const ALL: [HallDirection; 2] = [HallDirection::Up, HallDirection::Down];

    pub fn as_str(self) -> &'static str {
        match self {
            HallDirection::Up => "up",
            HallDirection::Down => "down",
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HallCall {
    pub floor: String,
    pub direction: HallDirection,
}

impl HallCall {
    pub fn new(floor: &str, direction: HallDirection) -> Self {
        HallCall {
            floor: floor.to_string(),
            direction,
        }
    }
}
