//! Unit and axis-convention conversions applied to node positions.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rad_deck::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
}

impl LengthUnit {
    /// Length of one unit in meters.
    pub fn meters(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Meter => 1.0,
            LengthUnit::Inch => 0.0254,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Inch => "in",
        }
    }
}

impl Display for LengthUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(LengthUnit::Millimeter),
            "cm" => Ok(LengthUnit::Centimeter),
            "m" => Ok(LengthUnit::Meter),
            "in" | "inch" => Ok(LengthUnit::Inch),
            other => Err(format!("unknown length unit '{other}'")),
        }
    }
}

/// Factor that converts a length expressed in `from` into `to`.
pub fn length_scale(from: LengthUnit, to: LengthUnit) -> f64 {
    if from == to {
        1.0
    } else {
        from.meters() / to.meters()
    }
}

/// Which axis points up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisConvention {
    YUp,
    ZUp,
}

pub fn convert_axes(p: Vec3, from: AxisConvention, to: AxisConvention) -> Vec3 {
    let [x, y, z] = p;
    match (from, to) {
        (AxisConvention::YUp, AxisConvention::ZUp) => [x, -z, y],
        (AxisConvention::ZUp, AxisConvention::YUp) => [x, z, -y],
        _ => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_scales() {
        assert_eq!(length_scale(LengthUnit::Millimeter, LengthUnit::Millimeter), 1.0);
        assert!((length_scale(LengthUnit::Millimeter, LengthUnit::Meter) - 0.001).abs() < 1e-15);
        assert!((length_scale(LengthUnit::Inch, LengthUnit::Millimeter) - 25.4).abs() < 1e-9);
        assert!((length_scale(LengthUnit::Meter, LengthUnit::Millimeter) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn unit_parsing() {
        assert_eq!("MM".parse::<LengthUnit>(), Ok(LengthUnit::Millimeter));
        assert_eq!("inch".parse::<LengthUnit>(), Ok(LengthUnit::Inch));
        assert!("furlong".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn axis_conversion_round_trips() {
        let p = [1.0, 2.0, 3.0];
        let z_up = convert_axes(p, AxisConvention::YUp, AxisConvention::ZUp);
        assert_eq!(z_up, [1.0, -3.0, 2.0]);
        assert_eq!(convert_axes(z_up, AxisConvention::ZUp, AxisConvention::YUp), p);
        assert_eq!(convert_axes(p, AxisConvention::ZUp, AxisConvention::ZUp), p);
    }
}
