//! Instance construction, field injection and singleton publication.

use super::{Container, ResolverContext};
use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::instance::{AnyArc, Instance};
use crate::registration::{FactoryFn, Recipe, RecipeSource};

impl Container {
    /// The recipe's instance: the published singleton, or a fresh one.
    pub(crate) fn materialize(&self, recipe: &Recipe) -> DiResult<Instance> {
        let factory = match recipe.source() {
            RecipeSource::Constructor => None,
            RecipeSource::Factory(factory) => Some(factory),
        };

        match recipe.slot() {
            Some(slot) => {
                let type_name = recipe.declared_type().display_name();
                slot.get_or_create(
                    || {
                        let instance = self.build(recipe.descriptor(), factory)?;
                        tracing::debug!(identity = %recipe.identity(), "singleton published");
                        Ok(instance)
                    },
                    || {
                        let path = self.inner.in_flight.path_to(type_name);
                        tracing::debug!(
                            type_name,
                            ?path,
                            "singleton re-entered during construction"
                        );
                        DiError::CircularDependency { type_name, path }
                    },
                )
            }
            None => self.build(recipe.descriptor(), factory),
        }
    }

    /// Constructs and injects one instance of the described type.
    pub(crate) fn build(
        &self,
        descriptor: &TypeDescriptor,
        factory: Option<&FactoryFn>,
    ) -> DiResult<Instance> {
        let type_name = descriptor.type_name();
        let _frame = self
            .inner
            .in_flight
            .enter_construction(type_name, self.inner.config.max_depth)?;

        let instance = match factory {
            Some(factory) => {
                let instance = factory(&ResolverContext::new(self))?;
                if instance.type_key() != descriptor.type_key() {
                    return Err(DiError::TypeMismatch(type_name));
                }
                instance
            }
            None => self.construct(descriptor)?,
        };

        self.inject_fields(&instance, descriptor)?;
        tracing::trace!(type_name, addr = instance.addr(), "instance created");
        Ok(instance)
    }

    /// Injectable constructor if declared, else the default constructor.
    fn construct(&self, descriptor: &TypeDescriptor) -> DiResult<Instance> {
        let type_name = descriptor.type_name();

        if let Some(ctor) = descriptor.injectable_constructor() {
            let mut args: Vec<AnyArc> = Vec::with_capacity(ctor.parameter_types().len());
            for param in ctor.parameter_types() {
                let resolved = self.resolve_by_type(*param)?;
                args.push(resolved.view().clone());
            }
            return ctor.invoke(&args).ok_or(DiError::TypeMismatch(type_name));
        }

        descriptor
            .default_constructor()
            .ok_or(DiError::NoSuitableConstructor(type_name))
    }

    /// Writes every injectable field of `instance`, own fields first.
    pub(crate) fn inject_fields(
        &self,
        instance: &Instance,
        descriptor: &TypeDescriptor,
    ) -> DiResult<()> {
        let fields = descriptor.injectable_fields();
        if fields.is_empty() {
            return Ok(());
        }

        let type_name = descriptor.type_name();
        let _in_flight = self.inner.in_flight.enter_injection(instance.addr(), type_name)?;

        let Some(owner) = instance.object() else {
            return Err(DiError::InjectionFailure {
                type_name,
                field: fields[0].name(),
                reason: "instance does not expose its fields".to_string(),
            });
        };

        for field in fields {
            let value = self.resolve_by_type(field.declared_type())?;
            field
                .write(owner, value.view())
                .map_err(|reason| DiError::InjectionFailure {
                    type_name,
                    field: field.name(),
                    reason,
                })?;
        }
        Ok(())
    }
}
