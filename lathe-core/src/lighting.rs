/// Phong reflectance evaluated per vertex
use crate::math::{dot, Vec3};

/// Reflectance coefficients shared by every vertex of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl LightingConfig {
    /// Flat lighting: every surface gets exactly `ambient`
    pub fn ambient_only(ambient: f64) -> Self {
        Self {
            ambient,
            diffuse: 0.0,
            specular: 0.0,
            shininess: 1.0,
        }
    }

    /// Phong intensity for one surface point.
    ///
    /// `normal`, `view_dir` (surface to viewer) and `light_dir` (surface to
    /// light) must be unit vectors. The result is not clamped; values above
    /// 1.0 saturate when the rasterizer quantizes them.
    pub fn reflectance(&self, normal: &Vec3, view_dir: &Vec3, light_dir: &Vec3) -> f64 {
        let n_dot_l = dot(normal, light_dir);
        let reflected = normal * (2.0 * n_dot_l) - light_dir;

        let diffuse = n_dot_l.max(0.0);
        let specular = dot(&reflected, view_dir).max(0.0).powf(self.shininess);

        self.ambient + self.diffuse * diffuse + self.specular * specular
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            diffuse: 0.7,
            specular: 0.1,
            shininess: 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::normalize;

    #[test]
    fn test_head_on_is_maximum() {
        let config = LightingConfig::default();
        let n = Vec3::z();
        let peak = config.reflectance(&n, &n, &n);
        assert!((peak - (0.2 + 0.7 + 0.1)).abs() < 1e-12);

        let samples = [
            Vec3::new(0.3, 0.0, 1.0),
            Vec3::new(-0.5, 0.5, 0.7),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.2),
        ];
        for light in &samples {
            for view in &samples {
                let value = config.reflectance(&n, &normalize(view), &normalize(light));
                assert!(value <= peak + 1e-12);
            }
        }
    }

    #[test]
    fn test_grazing_light_is_ambient_only() {
        let config = LightingConfig::default();
        let n = Vec3::z();
        let l = Vec3::x();
        // Reflection of a grazing light is -L, also perpendicular to N
        let v = Vec3::y();
        assert_eq!(config.reflectance(&n, &v, &l), config.ambient);
    }

    #[test]
    fn test_light_behind_surface() {
        let config = LightingConfig::default();
        let value = config.reflectance(&Vec3::z(), &Vec3::z(), &-Vec3::z());
        assert_eq!(value, config.ambient);
    }

    #[test]
    fn test_ambient_only_is_constant() {
        let config = LightingConfig::ambient_only(0.35);
        let n = normalize(&Vec3::new(1.0, 2.0, 3.0));
        let value = config.reflectance(&n, &n, &Vec3::x());
        assert_eq!(value, 0.35);
    }

    #[test]
    fn test_unclamped_result() {
        let config = LightingConfig {
            ambient: 0.5,
            diffuse: 1.0,
            specular: 1.0,
            shininess: 8.0,
        };
        let n = Vec3::y();
        assert!((config.reflectance(&n, &n, &n) - 2.5).abs() < 1e-12);
    }
}
