//! Recipe lookup: exact match first, then the assignability scan.

use std::sync::Arc;
use std::time::Instant;

use super::Container;
use crate::error::{DiError, DiResult, NotFoundReason};
use crate::instance::Instance;
use crate::key::{ServiceIdentity, TypeKey};
use crate::registration::Recipe;

impl Container {
    /// The recipe serving `ty`.
    ///
    /// The first recipe indexed under exactly `ty` wins. Otherwise indexed
    /// types are scanned in first-indexed order and the first one assignable
    /// to `ty` is used.
    pub(crate) fn find_by_type(&self, ty: TypeKey) -> DiResult<Arc<Recipe>> {
        if let Some(recipe) = self.inner.registry.first_for(ty) {
            return Ok(recipe);
        }

        for (candidate, recipe) in self.inner.registry.candidates() {
            if self.inner.graph.is_assignable(ty, candidate) {
                tracing::debug!(
                    requested = ty.display_name(),
                    candidate = candidate.display_name(),
                    "resolved by capability"
                );
                return Ok(recipe);
            }
        }

        Err(DiError::not_found(ServiceIdentity::of_type(ty), NotFoundReason::NotRegistered))
    }

    /// The recipe registered under `name`, provided it can serve `ty`.
    pub(crate) fn find_by_name(&self, name: &str, ty: TypeKey) -> DiResult<Arc<Recipe>> {
        let recipe = self
            .inner
            .registry
            .by_name(name)
            .ok_or_else(|| {
                DiError::not_found(ServiceIdentity::named(ty, name), NotFoundReason::UnknownName)
            })?;

        let declared = recipe.declared_type();
        if !self.inner.graph.is_assignable(ty, declared) {
            return Err(DiError::not_found(
                ServiceIdentity::named(ty, name),
                NotFoundReason::IncompatibleType {
                    declared: declared.display_name(),
                },
            ));
        }
        Ok(recipe)
    }

    pub(crate) fn resolve_by_type(&self, ty: TypeKey) -> DiResult<Instance> {
        let recipe = self.find_by_type(ty)?;
        let instance = self.materialize(&recipe)?;
        self.convert(instance, ty)
    }

    pub(crate) fn resolve_by_name(&self, name: &str, ty: TypeKey) -> DiResult<Instance> {
        let recipe = self.find_by_name(name, ty)?;
        let instance = self.materialize(&recipe)?;
        self.convert(instance, ty)
    }

    /// Views `instance` as `to`, composing supertype casts as needed.
    pub(crate) fn convert(&self, instance: Instance, to: TypeKey) -> DiResult<Instance> {
        let from = instance.type_key();
        if from == to {
            return Ok(instance);
        }
        match self.inner.graph.cast(instance.view(), from, to) {
            Some(view) => Ok(Instance::from_view(view, to, instance.addr())),
            None => Err(DiError::TypeMismatch(to.display_name())),
        }
    }

    /// Runs `resolve`, reporting to observers when any are installed.
    pub(crate) fn observed<I, R>(&self, identity: I, resolve: R) -> DiResult<Instance>
    where
        I: FnOnce() -> ServiceIdentity,
        R: FnOnce() -> DiResult<Instance>,
    {
        let observers = self.observers();
        if !observers.has_observers() {
            return resolve();
        }

        let identity = identity();
        observers.resolving(&identity);
        let started = Instant::now();
        let result = resolve();
        match &result {
            Ok(_) => observers.resolved(&identity, started.elapsed()),
            Err(error) => observers.resolution_failed(&identity, error),
        }
        result
    }
}
