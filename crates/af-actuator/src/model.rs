//! Generic actuator instance and the object-safe interface used by drivers.
//!
//! [`ActModel<T, S>`] binds a kind and a source topology. Its stage methods
//! forward to the [`ActuatorOps`] impl for that pair and enforce the
//! lifecycle order. Drivers hold instances as `Box<dyn Actuator>`.

use crate::data::{ActDataHolder, ActGrid, ActInfo};
use crate::error::{ActError, ActResult};
use crate::field::FieldSampler;
use crate::ops::{ActuatorOps, InitContext};
use crate::types::{ActSrc, Stage, identifier};
use af_core::{ActuatorId, BoundingBox, Mat3, Real, Vec3, ensure_finite};
use af_params::{ActParser, validate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::{debug, info};

pub struct ActModel<T: ActuatorOps<S>, S: ActSrc> {
    data: ActDataHolder<T>,
    stage: Stage,
    _src: PhantomData<fn() -> S>,
}

impl<T: ActuatorOps<S>, S: ActSrc> ActModel<T, S> {
    pub fn new(label: impl Into<String>, id: ActuatorId) -> Self {
        Self {
            data: ActDataHolder::new(label, id),
            stage: Stage::Uninitialized,
            _src: PhantomData,
        }
    }

    /// Create and parse in one go.
    pub fn from_parser(id: ActuatorId, pp: &ActParser) -> ActResult<Self> {
        let mut model = Self::new(pp.label(), id);
        model.read_inputs(pp)?;
        Ok(model)
    }

    pub fn type_identifier() -> String {
        identifier(T::KIND, S::TOPOLOGY)
    }

    pub fn data(&self) -> &ActDataHolder<T> {
        &self.data
    }

    pub fn meta(&self) -> &T::MetaType {
        &self.data.meta
    }

    fn expect_stage(&self, expected: Stage) -> ActResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ActError::Lifecycle {
                label: self.data.info.label.clone(),
                expected,
                found: self.stage,
            })
        }
    }

    /// Validate cross-parameter rules, then read the kind's inputs.
    pub fn read_inputs(&mut self, pp: &ActParser) -> ActResult<()> {
        self.expect_stage(Stage::Uninitialized)?;
        validate(pp, T::PARSE_RULES)?;
        T::read_inputs(&mut self.data, pp)?;
        self.stage = Stage::Parsed;
        debug!(label = %self.data.info.label, "parsed actuator inputs");
        Ok(())
    }

    fn init_impl(&mut self, ctx: &mut InitContext<'_>) -> ActResult<()> {
        self.expect_stage(Stage::Parsed)?;
        let label = self.data.info.label.clone();
        if let Some(domain) = &ctx.domain {
            if !domain.contains_box(&self.data.info.bound_box) {
                return Err(ActError::domain(
                    &label,
                    format!(
                        "region of influence {:?}..{:?} extends outside the domain {:?}..{:?}",
                        self.data.info.bound_box.lo,
                        self.data.info.bound_box.hi,
                        domain.lo,
                        domain.hi
                    ),
                ));
            }
        }
        T::init_data(&mut self.data, ctx)?;
        self.stage = Stage::Ready;
        info!(
            label = %label,
            kind = %Self::type_identifier(),
            force_points = self.data.grid.num_force_points(),
            velocity_points = self.data.grid.num_velocity_points(),
            "actuator initialized"
        );
        Ok(())
    }

    fn sample_velocities(&mut self, field: &dyn FieldSampler) -> ActResult<()> {
        let ActDataHolder { grid, info, .. } = &mut self.data;
        for ((pos, vel), rho) in grid.vel_pos.iter().zip(&mut grid.vel).zip(&mut grid.density) {
            let s = field
                .sample(pos)
                .map_err(|e| ActError::domain(&info.label, e))?;
            for v in s.velocity.iter() {
                ensure_finite(*v, "sampled velocity")
                    .map_err(|e| ActError::domain(&info.label, e))?;
            }
            *rho = ensure_finite(s.density, "sampled density")
                .map_err(|e| ActError::domain(&info.label, e))?;
            *vel = s.velocity;
        }
        Ok(())
    }
}

/// Read-only view of the force points handed to the mesh layer.
#[derive(Clone, Copy, Debug)]
pub struct ForceView<'a> {
    pub pos: &'a [Vec3],
    pub force: &'a [Vec3],
    pub epsilon: &'a [Vec3],
    /// Empty for kinds without per-point frames.
    pub orientation: &'a [Mat3],
    pub bound_box: &'a BoundingBox,
}

impl ForceView<'_> {
    pub fn total_force(&self) -> Vec3 {
        self.force.iter().sum()
    }
}

/// Serializable state of one actuator after a step.
#[derive(Clone, Debug, Serialize)]
pub struct ActuatorSnapshot {
    pub label: String,
    pub identifier: String,
    pub stage: Stage,
    pub bound_box: BoundingBox,
    pub scalars: BTreeMap<String, Real>,
}

/// Object-safe interface over every registered `(kind, topology)` pair.
pub trait Actuator: Send {
    fn id(&self) -> ActuatorId;

    fn label(&self) -> &str;

    /// Registry identifier, e.g. `UniformCtDisk`.
    fn identifier(&self) -> String;

    fn stage(&self) -> Stage;

    /// Allocate the grid and resolve shared resources. Requires `Parsed`.
    fn init(&mut self, ctx: &mut InitContext<'_>) -> ActResult<()>;

    fn update_positions(&mut self) -> ActResult<()>;

    /// Sample `field` at every velocity point, then reduce.
    fn update_velocities(&mut self, field: &dyn FieldSampler) -> ActResult<()>;

    fn compute_forces(&mut self) -> ActResult<()>;

    /// One full step: positions, velocities, forces.
    fn step(&mut self, field: &dyn FieldSampler) -> ActResult<()> {
        self.update_positions()?;
        self.update_velocities(field)?;
        self.compute_forces()
    }

    fn info(&self) -> &ActInfo;

    fn grid(&self) -> &ActGrid;

    fn force_view(&self) -> ForceView<'_> {
        let grid = self.grid();
        ForceView {
            pos: &grid.pos,
            force: &grid.force,
            epsilon: &grid.epsilon,
            orientation: &grid.orientation,
            bound_box: &self.info().bound_box,
        }
    }

    fn snapshot(&self) -> ActuatorSnapshot;
}

impl<T: ActuatorOps<S>, S: ActSrc> Actuator for ActModel<T, S> {
    fn id(&self) -> ActuatorId {
        self.data.info.id
    }

    fn label(&self) -> &str {
        self.data.label()
    }

    fn identifier(&self) -> String {
        Self::type_identifier()
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> ActResult<()> {
        self.init_impl(ctx)
    }

    fn update_positions(&mut self) -> ActResult<()> {
        self.expect_stage(Stage::Ready)?;
        T::update_pos(&mut self.data)
    }

    fn update_velocities(&mut self, field: &dyn FieldSampler) -> ActResult<()> {
        self.expect_stage(Stage::Ready)?;
        self.sample_velocities(field)?;
        T::update_vel(&mut self.data)
    }

    fn compute_forces(&mut self) -> ActResult<()> {
        self.expect_stage(Stage::Ready)?;
        T::compute_force(&mut self.data)
    }

    fn info(&self) -> &ActInfo {
        &self.data.info
    }

    fn grid(&self) -> &ActGrid {
        &self.data.grid
    }

    fn snapshot(&self) -> ActuatorSnapshot {
        ActuatorSnapshot {
            label: self.data.info.label.clone(),
            identifier: Self::type_identifier(),
            stage: self.stage,
            bound_box: self.data.info.bound_box,
            scalars: T::scalars(&self.data)
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::UniformFlow;
    use crate::types::{ActSrcDisk, UniformCt};
    use af_interp::AirfoilCache;
    use serde_yaml::Mapping;

    fn disk_parser() -> ActParser {
        let instance: Mapping = serde_yaml::from_str(
            r#"
type: UniformCtDisk
disk_center: [0.0, 0.0, 0.0]
rotor_diameter: 2.0
num_points_r: 2
num_points_t: 4
epsilon: 0.1
thrust_coeff: [0.9, 0.7]
wind_speed: [0.0, 2.0]
"#,
        )
        .unwrap();
        ActParser::new("T1", "UniformCtDisk", instance, None)
    }

    fn id() -> ActuatorId {
        ActuatorId::from_index(1).unwrap()
    }

    #[test]
    fn stages_run_in_order() {
        let mut model = ActModel::<UniformCt, ActSrcDisk>::new("T1", id());
        let flow = UniformFlow::new(Vec3::x(), 1.225);
        let err = model.step(&flow).unwrap_err();
        assert!(matches!(
            err,
            ActError::Lifecycle {
                expected: Stage::Ready,
                found: Stage::Uninitialized,
                ..
            }
        ));

        let mut cache = AirfoilCache::new();
        let mut ctx = InitContext {
            domain: None,
            airfoils: &mut cache,
        };
        assert!(model.init(&mut ctx).is_err());

        model.read_inputs(&disk_parser()).unwrap();
        assert_eq!(model.stage(), Stage::Parsed);
        assert!(model.read_inputs(&disk_parser()).is_err());

        model.init(&mut ctx).unwrap();
        assert_eq!(model.stage(), Stage::Ready);
        model.step(&flow).unwrap();
        assert!(model.init(&mut ctx).is_err());
    }

    #[test]
    fn non_finite_sample_is_a_domain_error() {
        let mut model =
            ActModel::<UniformCt, ActSrcDisk>::from_parser(id(), &disk_parser()).unwrap();
        let mut cache = AirfoilCache::new();
        let mut ctx = InitContext {
            domain: None,
            airfoils: &mut cache,
        };
        model.init(&mut ctx).unwrap();

        let nan_flow = UniformFlow::new(Vec3::new(Real::NAN, 0.0, 0.0), 1.225);
        let err = model.step(&nan_flow).unwrap_err();
        assert!(matches!(err, ActError::Domain { .. }));
        assert!(err.to_string().contains("sampled velocity"));

        let bad_density = UniformFlow::new(Vec3::x(), Real::INFINITY);
        assert!(matches!(
            model.step(&bad_density),
            Err(ActError::Domain { .. })
        ));
        assert_eq!(model.stage(), Stage::Ready);
    }

    #[test]
    fn snapshot_lists_kind_scalars() {
        let mut model =
            ActModel::<UniformCt, ActSrcDisk>::from_parser(id(), &disk_parser()).unwrap();
        let mut cache = AirfoilCache::new();
        let mut ctx = InitContext {
            domain: None,
            airfoils: &mut cache,
        };
        model.init(&mut ctx).unwrap();
        model.step(&UniformFlow::new(Vec3::x(), 1.0)).unwrap();

        let snap = model.snapshot();
        assert_eq!(snap.identifier, "UniformCtDisk");
        assert!((snap.scalars["ct"] - 0.8).abs() < 1e-12);
        assert!(model.force_view().total_force().x < 0.0);
    }
}
