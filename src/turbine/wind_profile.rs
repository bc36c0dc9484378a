use crate::error::{Result, SimError};

/// Share of the obstacle height treated as zero-plane displacement.
const DISPLACEMENT_FACTOR: f64 = 0.7;

/// Logarithmic wind profile between a measurement height and a hub height.
///
/// The hub-height wind speed is
///
/// ```text
/// v_hub = v_ref * ln((h_hub - 0.7 d) / z0) / ln((h_ref - 0.7 d) / z0)
/// ```
///
/// where `z0` is the roughness length and `d` the obstacle height. With no
/// obstacle this reduces to `v_ref * ln(h_hub / z0) / ln(h_ref / z0)`.
///
/// # Examples
///
/// ```
/// use ppa_sim::turbine::WindProfile;
///
/// let profile = WindProfile::new(10.0, 10.0, 0.0).unwrap();
/// assert_eq!(profile.hub_wind_speed(8.0, 0.1).unwrap(), 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindProfile {
    /// Height of the wind-speed measurement (m).
    pub reference_height_m: f64,
    /// Turbine hub height (m).
    pub hub_height_m: f64,
    /// Height of surrounding obstacles (m, 0 for open terrain).
    pub obstacle_height_m: f64,
}

impl WindProfile {
    /// Creates a profile after checking that both effective heights are positive.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] for non-finite or non-positive heights,
    /// a negative obstacle height, or an obstacle that swallows either height.
    pub fn new(reference_height_m: f64, hub_height_m: f64, obstacle_height_m: f64) -> Result<Self> {
        for (name, value) in [
            ("reference height", reference_height_m),
            ("hub height", hub_height_m),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidSpec(format!(
                    "{name} must be a positive number of metres, got {value}"
                )));
            }
        }
        if !obstacle_height_m.is_finite() || obstacle_height_m < 0.0 {
            return Err(SimError::InvalidSpec(format!(
                "obstacle height must be >= 0 m, got {obstacle_height_m}"
            )));
        }

        let profile = Self {
            reference_height_m,
            hub_height_m,
            obstacle_height_m,
        };
        if profile.effective_reference_height() <= 0.0 || profile.effective_hub_height() <= 0.0 {
            return Err(SimError::InvalidSpec(format!(
                "obstacle height {obstacle_height_m} m leaves no effective measurement or hub height"
            )));
        }
        Ok(profile)
    }

    fn effective_reference_height(&self) -> f64 {
        self.reference_height_m - DISPLACEMENT_FACTOR * self.obstacle_height_m
    }

    fn effective_hub_height(&self) -> f64 {
        self.hub_height_m - DISPLACEMENT_FACTOR * self.obstacle_height_m
    }

    /// Extrapolates a measured wind speed to hub height.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] when the roughness length is not a
    /// positive finite number or is not below both effective heights, where
    /// the logarithm would be zero or negative.
    pub fn hub_wind_speed(&self, wind_speed: f64, roughness_length: f64) -> Result<f64> {
        if !roughness_length.is_finite() || roughness_length <= 0.0 {
            return Err(SimError::InvalidSpec(format!(
                "roughness length must be > 0 m, got {roughness_length}"
            )));
        }

        let h_ref = self.effective_reference_height();
        let h_hub = self.effective_hub_height();
        if roughness_length >= h_ref.min(h_hub) {
            return Err(SimError::InvalidSpec(format!(
                "roughness length {roughness_length} m must be below the effective \
                 measurement ({h_ref} m) and hub ({h_hub} m) heights"
            )));
        }

        Ok(wind_speed * (h_hub / roughness_length).ln() / (h_ref / roughness_length).ln())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_height_is_identity() {
        let p = WindProfile::new(10.0, 10.0, 0.0).unwrap();
        assert_eq!(p.hub_wind_speed(7.3, 0.03).unwrap(), 7.3);
    }

    #[test]
    fn higher_hub_increases_speed() {
        let p = WindProfile::new(10.0, 100.0, 0.0).unwrap();
        let v = p.hub_wind_speed(8.0, 0.1).unwrap();
        // ln(1000) / ln(100) = 1.5
        assert!((v - 12.0).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn rougher_terrain_steepens_profile() {
        let p = WindProfile::new(10.0, 100.0, 0.0).unwrap();
        let smooth = p.hub_wind_speed(8.0, 0.01).unwrap();
        let rough = p.hub_wind_speed(8.0, 0.5).unwrap();
        assert!(rough > smooth);
    }

    #[test]
    fn obstacle_shifts_effective_heights() {
        let open = WindProfile::new(10.0, 100.0, 0.0).unwrap();
        let built = WindProfile::new(10.0, 100.0, 5.0).unwrap();
        let v_open = open.hub_wind_speed(6.0, 0.1).unwrap();
        let v_built = built.hub_wind_speed(6.0, 0.1).unwrap();
        let expected = 6.0 * (96.5_f64 / 0.1).ln() / (6.5_f64 / 0.1).ln();
        assert!((v_built - expected).abs() < 1e-12);
        assert!(v_built > v_open);
    }

    #[test]
    fn rejects_non_positive_roughness() {
        let p = WindProfile::new(10.0, 100.0, 0.0).unwrap();
        for z0 in [0.0, -0.1, f64::NAN] {
            assert!(matches!(
                p.hub_wind_speed(5.0, z0),
                Err(SimError::InvalidSpec(_))
            ));
        }
    }

    #[test]
    fn rejects_roughness_at_measurement_height() {
        let p = WindProfile::new(10.0, 100.0, 0.0).unwrap();
        assert!(p.hub_wind_speed(5.0, 10.0).is_err());
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(WindProfile::new(0.0, 100.0, 0.0).is_err());
        assert!(WindProfile::new(10.0, -1.0, 0.0).is_err());
        assert!(WindProfile::new(10.0, 100.0, -2.0).is_err());
        assert!(WindProfile::new(10.0, 100.0, 20.0).is_err());
    }
}
