use oracle_types::{TypeParamOwner, TypeParameter};

use crate::error::{ResolveError, Result};
use crate::resolver::Resolver;
use crate::session::Session;
use crate::sig_type::SigType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundKind {
    Class,
    Interface,
}

#[derive(Debug)]
struct PendingParam<'s> {
    name: &'s str,
    has_class_bound: bool,
    bounds: Vec<SigType<'s>>,
}

/// Formal type parameters collected from a signature, bounds still symbolic.
///
/// Every name is declared before any bound is resolved, so bounds may refer to their own
/// parameter (`<T:Ljava/lang/Comparable<TT;>;>`) or to a later one (`<A:TB;B:...>`).
#[derive(Debug, Default)]
pub(crate) struct PendingTypeParams<'s> {
    params: Vec<PendingParam<'s>>,
}

impl<'s> PendingTypeParams<'s> {
    pub(crate) fn declare(&mut self, name: &'s str) -> Result<()> {
        if self.params.iter().any(|p| p.name == name) {
            return Err(ResolveError::malformed(format!(
                "duplicate type parameter `{name}`"
            )));
        }
        self.params.push(PendingParam {
            name,
            has_class_bound: false,
            bounds: Vec::new(),
        });
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub(crate) fn add_bound(&mut self, kind: BoundKind, ty: SigType<'s>) -> Result<()> {
        let Some(param) = self.params.last_mut() else {
            return Err(ResolveError::malformed("bound before any type parameter"));
        };
        if kind == BoundKind::Class {
            if param.has_class_bound || !param.bounds.is_empty() {
                return Err(ResolveError::malformed(format!(
                    "class bound of `{}` after another bound",
                    param.name
                )));
            }
            param.has_class_bound = true;
        }
        param.bounds.push(ty);
        Ok(())
    }

    /// Pushes the owner's scope onto the session's lookup, then resolves every bound.
    ///
    /// `predeclared` holds the parameters the registry already knows for the owner; when
    /// present they must match the signature by count and name.
    pub(crate) fn resolve<R: Resolver + ?Sized>(
        self,
        session: &mut Session<'_, R>,
        owner: TypeParamOwner,
        predeclared: &[TypeParameter],
    ) -> Result<Vec<TypeParameter>> {
        if !predeclared.is_empty() {
            let declared: Vec<&str> = predeclared.iter().map(|p| p.name.as_str()).collect();
            let signature: Vec<&str> = self.params.iter().map(|p| p.name).collect();
            if declared != signature {
                return Err(ResolveError::shape(format!(
                    "signature declares <{}> but the descriptor declares <{}>",
                    signature.join(", "),
                    declared.join(", ")
                )));
            }
        }
        if self.params.is_empty() {
            return Ok(Vec::new());
        }

        session
            .lookup
            .push_scope(owner, self.params.iter().map(|p| p.name));

        let mut resolved = Vec::with_capacity(self.params.len());
        for (index, param) in self.params.into_iter().enumerate() {
            let bounds = param
                .bounds
                .iter()
                .map(|bound| session.resolve_reference(bound))
                .collect::<Result<Vec<_>>>()?;
            resolved.push(TypeParameter {
                name: param.name.to_owned(),
                index: index as u32,
                owner,
                bounds,
            });
        }
        Ok(resolved)
    }
}
