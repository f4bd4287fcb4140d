//! YAML wing description files.

use ll_core::units::{deg, m, m2};
use ll_geom::elliptical::TorsionShape;
use ll_geom::{EllipticalPlanform, GeometryError};
use ll_section::{
    CubicBrakes, LinearSection, PolySection, SectionCoefficients, SectionError, TableSection,
};
use serde::Deserialize;
use std::sync::Arc;

/// Top-level wing description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WingFile {
    pub planform: PlanformSpec,
    pub section: SectionSpec,
    #[serde(default)]
    pub brakes: Option<BrakeSpec>,
}

/// Elliptical planform parameters. Angles in degrees, lengths in meters.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanformSpec {
    pub span_m: f64,
    pub area_m2: f64,
    pub taper: f64,
    #[serde(default)]
    pub sweep_med_deg: f64,
    #[serde(default)]
    pub sweep_max_deg: f64,
    #[serde(default)]
    pub dihedral_med_deg: f64,
    #[serde(default)]
    pub dihedral_max_deg: f64,
    #[serde(default)]
    pub torsion_deg: f64,
    #[serde(default)]
    pub torsion_shape: TorsionShapeSpec,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorsionShapeSpec {
    #[default]
    Linear,
    Exponential,
}

/// Section coefficient model, one of the interchangeable strategies.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionSpec {
    Linear {
        /// Lift-curve slope per radian
        slope: f64,
        #[serde(default)]
        alpha_zero_deg: f64,
        alpha_min_deg: f64,
        alpha_max_deg: f64,
        #[serde(default = "default_cd0")]
        cd0: f64,
        #[serde(default = "default_d2")]
        d2: f64,
        #[serde(default)]
        cm0: f64,
        #[serde(default)]
        delta_gain_deg: f64,
    },
    Table {
        alpha_deg: Vec<f64>,
        cl: Vec<f64>,
        cd: Vec<f64>,
        cm: Vec<f64>,
        #[serde(default)]
        delta_gain_deg: f64,
    },
    Poly {
        /// Polynomial coefficients in ascending powers of alpha (radians)
        cl: Vec<f64>,
        cd: Vec<f64>,
        cm: Vec<f64>,
        alpha_min_deg: f64,
        alpha_max_deg: f64,
        #[serde(default)]
        delta_gain_deg: f64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrakeSpec {
    /// Fraction of the semispan where brake deflection begins
    pub start_fraction: f64,
}

fn default_cd0() -> f64 {
    0.01
}

fn default_d2() -> f64 {
    0.05
}

impl PlanformSpec {
    pub fn build(&self) -> Result<EllipticalPlanform, GeometryError> {
        let shape = match self.torsion_shape {
            TorsionShapeSpec::Linear => TorsionShape::Linear,
            TorsionShapeSpec::Exponential => TorsionShape::Exponential,
        };
        EllipticalPlanform::from_span_and_area(
            m(self.span_m),
            m2(self.area_m2),
            self.taper,
            deg(self.sweep_med_deg),
            deg(self.sweep_max_deg),
            deg(self.dihedral_med_deg),
            deg(self.dihedral_max_deg),
            deg(self.torsion_deg),
            shape,
        )
    }
}

impl SectionSpec {
    pub fn build(&self) -> Result<Arc<dyn SectionCoefficients>, SectionError> {
        match self {
            SectionSpec::Linear {
                slope,
                alpha_zero_deg,
                alpha_min_deg,
                alpha_max_deg,
                cd0,
                d2,
                cm0,
                delta_gain_deg,
            } => {
                let section = LinearSection::new(
                    *slope,
                    alpha_zero_deg.to_radians(),
                    alpha_min_deg.to_radians(),
                    alpha_max_deg.to_radians(),
                )?
                .with_drag(*cd0, *d2)
                .with_moment(*cm0)
                .with_delta_gain(delta_gain_deg.to_radians());
                Ok(Arc::new(section))
            }
            SectionSpec::Table {
                alpha_deg,
                cl,
                cd,
                cm,
                delta_gain_deg,
            } => {
                let alphas = alpha_deg.iter().map(|a| a.to_radians()).collect();
                let table = TableSection::new(alphas, cl.clone(), cd.clone(), cm.clone())?
                    .with_delta_gain(delta_gain_deg.to_radians());
                Ok(Arc::new(table))
            }
            SectionSpec::Poly {
                cl,
                cd,
                cm,
                alpha_min_deg,
                alpha_max_deg,
                delta_gain_deg,
            } => {
                let poly = PolySection::new(
                    cl.clone(),
                    cd.clone(),
                    cm.clone(),
                    alpha_min_deg.to_radians(),
                    alpha_max_deg.to_radians(),
                )?
                .with_delta_gain(delta_gain_deg.to_radians());
                Ok(Arc::new(poly))
            }
        }
    }
}

impl BrakeSpec {
    pub fn build(&self) -> Result<CubicBrakes, SectionError> {
        CubicBrakes::new(self.start_fraction)
    }
}
