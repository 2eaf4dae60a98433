//! Resource triples (metal, crystal, deuterium) shared by the parser and the settlement engine.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Metal,
    Crystal,
    Deuterium,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Metal, Resource::Crystal, Resource::Deuterium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metal => "metal",
            Self::Crystal => "crystal",
            Self::Deuterium => "deuterium",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Amount of each resource. Kept as `f64` so weighted shares are never rounded
/// before presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub metal: f64,
    #[serde(default)]
    pub crystal: f64,
    #[serde(default)]
    pub deuterium: f64,
}

impl Resources {
    pub const ZERO: Resources = Resources {
        metal: 0.0,
        crystal: 0.0,
        deuterium: 0.0,
    };

    pub const fn new(metal: f64, crystal: f64, deuterium: f64) -> Self {
        Self {
            metal,
            crystal,
            deuterium,
        }
    }

    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Metal => self.metal,
            Resource::Crystal => self.crystal,
            Resource::Deuterium => self.deuterium,
        }
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        match resource {
            Resource::Metal => self.metal = value,
            Resource::Crystal => self.crystal = value,
            Resource::Deuterium => self.deuterium = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.metal + self.crystal + self.deuterium
    }

    pub fn is_zero(&self) -> bool {
        self.metal == 0.0 && self.crystal == 0.0 && self.deuterium == 0.0
    }

    /// Component-wise rounding to whole resource units.
    pub fn rounded(&self) -> Self {
        Self::new(self.metal.round(), self.crystal.round(), self.deuterium.round())
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(self, rhs: Resources) -> Resources {
        Resources::new(
            self.metal + rhs.metal,
            self.crystal + rhs.crystal,
            self.deuterium + rhs.deuterium,
        )
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        *self = *self + rhs;
    }
}

impl Sub for Resources {
    type Output = Resources;

    fn sub(self, rhs: Resources) -> Resources {
        Resources::new(
            self.metal - rhs.metal,
            self.crystal - rhs.crystal,
            self.deuterium - rhs.deuterium,
        )
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Resources) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Resources {
    type Output = Resources;

    fn mul(self, factor: f64) -> Resources {
        Resources::new(
            self.metal * factor,
            self.crystal * factor,
            self.deuterium * factor,
        )
    }
}

impl std::iter::Sum for Resources {
    fn sum<I: Iterator<Item = Resources>>(iter: I) -> Resources {
        iter.fold(Resources::ZERO, |acc, r| acc + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Resources::new(10.0, 20.0, 30.0);
        let b = Resources::new(1.0, 2.0, 3.0);
        assert_eq!(a + b, Resources::new(11.0, 22.0, 33.0));
        assert_eq!(a - b, Resources::new(9.0, 18.0, 27.0));
        assert_eq!(b * 2.0, Resources::new(2.0, 4.0, 6.0));
        assert_eq!((a + b).total(), 66.0);
    }

    #[test]
    fn get_and_set_follow_resource_order() {
        let mut r = Resources::ZERO;
        for (i, resource) in Resource::ALL.iter().enumerate() {
            r.set(*resource, i as f64 + 1.0);
        }
        assert_eq!(r, Resources::new(1.0, 2.0, 3.0));
        assert_eq!(r.get(Resource::Crystal), 2.0);
    }

    #[test]
    fn missing_fields_deserialize_as_zero() {
        let r: Resources = serde_json::from_str(r#"{"metal": 5}"#).expect("parse");
        assert_eq!(r, Resources::new(5.0, 0.0, 0.0));
    }
}
