use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::DVector;

use crate::prelude::*;

/// Marker trait for anything the swarm can maximize.
///
/// The swarm treats `CostFunction::cost` as "higher is better", whatever argmin calls it. Any
/// `CostFunction` over `DVector<f64>` producing an `f64` qualifies, so problem types that already
/// implement the argmin traits can be handed to the swarm unchanged.
pub trait Objective: CostFunction<Param = DVector<f64>, Output = f64> {}

/// Automatically implement for any type that satisfies the bounds
impl<T> Objective for T where T: CostFunction<Param = DVector<f64>, Output = f64> {}

/// Wraps an infallible closure as an objective.
#[derive(Clone)]
pub struct ObjectiveFn<F> {
    f: F,
}

impl<F> ObjectiveFn<F>
where
    F: Fn(&DVector<f64>) -> f64,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CostFunction for ObjectiveFn<F>
where
    F: Fn(&DVector<f64>) -> f64,
{
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok((self.f)(p))
    }
}

/// Wraps a closure that can fail, e.g. one that drives an external simulator.
#[derive(Clone)]
pub struct FallibleObjectiveFn<F> {
    f: F,
}

impl<F> FallibleObjectiveFn<F>
where
    F: Fn(&DVector<f64>) -> Result<f64, ArgminError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CostFunction for FallibleObjectiveFn<F>
where
    F: Fn(&DVector<f64>) -> Result<f64, ArgminError>,
{
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        (self.f)(p)
    }
}

/// Evaluates the objective once, attaching the run location to any failure and rejecting
/// non-finite values.
pub(crate) fn evaluate<O: Objective + ?Sized>(
    objective: &O,
    position: &DVector<f64>,
    location: EvalLocation,
) -> Result<f64, SwarmError> {
    let value = objective
        .cost(position)
        .map_err(|source| SwarmError::Objective { location, source })?;

    if !value.is_finite() {
        return Err(SwarmError::NonFinite {
            quantity: NonFiniteQuantity::ObjectiveValue,
            location,
        });
    }

    tracing::trace!(%location, value, "objective evaluated");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn closure_objective_is_forwarded() {
        let obj = ObjectiveFn::new(|x: &DVector<f64>| x.sum());
        let p = DVector::from_vec(vec![1.0, 2.0, 3.5]);
        assert_eq!(obj.cost(&p).unwrap(), 6.5);
    }

    #[test]
    fn objective_failure_carries_location() {
        let obj = FallibleObjectiveFn::new(|_: &DVector<f64>| Err(anyhow!("simulator offline")));
        let loc = EvalLocation::Step {
            iteration: 3,
            particle: 7,
        };
        let err = evaluate(&obj, &DVector::zeros(2), loc).unwrap_err();
        match err {
            SwarmError::Objective { location, source } => {
                assert_eq!(location, loc);
                assert_eq!(source.to_string(), "simulator offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nan_value_is_rejected() {
        let obj = ObjectiveFn::new(|_: &DVector<f64>| f64::NAN);
        let err = evaluate(&obj, &DVector::zeros(1), EvalLocation::InitialParams).unwrap_err();
        assert!(matches!(
            err,
            SwarmError::NonFinite {
                quantity: NonFiniteQuantity::ObjectiveValue,
                location: EvalLocation::InitialParams,
            }
        ));
    }
}
