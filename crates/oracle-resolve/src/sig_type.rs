//! Symbolic types assembled from signature events, before any name is resolved.

use oracle_classfile::{BaseType, SignatureEvent, WildcardKind};

use crate::error::{ResolveError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SigType<'s> {
    Base(BaseType),
    Void,
    Var(&'s str),
    Array(Box<SigType<'s>>),
    /// Outermost segment first; `Outer<TT;>.Inner` has two segments.
    Class(Vec<ClassSegment<'s>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassSegment<'s> {
    pub(crate) name: &'s str,
    pub(crate) args: Vec<SigArg<'s>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SigArg<'s> {
    Unbounded,
    Bounded(WildcardKind, SigType<'s>),
}

#[derive(Debug)]
enum Frame<'s> {
    Array,
    Class(Vec<ClassSegment<'s>>),
    Argument(WildcardKind),
}

/// Folds the type events between two section markers into one [`SigType`].
#[derive(Debug, Default)]
pub(crate) struct TypeBuilder<'s> {
    stack: Vec<Frame<'s>>,
}

impl<'s> TypeBuilder<'s> {
    /// True when no type is half-built.
    pub(crate) fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// Feeds one type event; returns the finished type once its last event arrives.
    pub(crate) fn push(&mut self, event: SignatureEvent<'s>) -> Result<Option<SigType<'s>>> {
        match event {
            SignatureEvent::BaseType(base) => self.complete(SigType::Base(base)),
            SignatureEvent::VoidType => self.complete(SigType::Void),
            SignatureEvent::TypeVariable(name) => self.complete(SigType::Var(name)),
            SignatureEvent::ArrayType => {
                self.stack.push(Frame::Array);
                Ok(None)
            }
            SignatureEvent::ClassType(name) => {
                self.stack.push(Frame::Class(vec![ClassSegment {
                    name,
                    args: Vec::new(),
                }]));
                Ok(None)
            }
            SignatureEvent::InnerClassType(name) => match self.stack.last_mut() {
                Some(Frame::Class(segments)) => {
                    segments.push(ClassSegment {
                        name,
                        args: Vec::new(),
                    });
                    Ok(None)
                }
                _ => Err(unexpected(event)),
            },
            SignatureEvent::TypeArgument(kind) => match self.stack.last() {
                Some(Frame::Class(_)) => {
                    self.stack.push(Frame::Argument(kind));
                    Ok(None)
                }
                _ => Err(unexpected(event)),
            },
            SignatureEvent::UnboundedTypeArgument => match self.stack.last_mut() {
                Some(Frame::Class(segments)) => match segments.last_mut() {
                    Some(segment) => {
                        segment.args.push(SigArg::Unbounded);
                        Ok(None)
                    }
                    None => Err(unexpected(event)),
                },
                _ => Err(unexpected(event)),
            },
            SignatureEvent::End => match self.stack.pop() {
                Some(Frame::Class(segments)) => self.complete(SigType::Class(segments)),
                Some(frame) => {
                    self.stack.push(frame);
                    Err(unexpected(event))
                }
                None => Err(unexpected(event)),
            },
            SignatureEvent::FormalTypeParameter(_)
            | SignatureEvent::ClassBound
            | SignatureEvent::InterfaceBound
            | SignatureEvent::Superclass
            | SignatureEvent::Interface
            | SignatureEvent::ParameterType
            | SignatureEvent::ReturnType
            | SignatureEvent::ExceptionType => Err(unexpected(event)),
        }
    }

    fn complete(&mut self, mut ty: SigType<'s>) -> Result<Option<SigType<'s>>> {
        loop {
            match self.stack.pop() {
                None => return Ok(Some(ty)),
                Some(Frame::Array) => ty = SigType::Array(Box::new(ty)),
                Some(Frame::Argument(kind)) => {
                    return match self.stack.last_mut() {
                        Some(Frame::Class(segments)) => match segments.last_mut() {
                            Some(segment) => {
                                segment.args.push(SigArg::Bounded(kind, ty));
                                Ok(None)
                            }
                            None => Err(ResolveError::malformed("type argument outside a class type")),
                        },
                        _ => Err(ResolveError::malformed("type argument outside a class type")),
                    };
                }
                Some(frame @ Frame::Class(_)) => {
                    self.stack.push(frame);
                    return Err(ResolveError::malformed(
                        "type inside a class type without a type-argument marker",
                    ));
                }
            }
        }
    }
}

pub(crate) fn unexpected(event: SignatureEvent<'_>) -> ResolveError {
    ResolveError::malformed(format!("unexpected {} event", event.label()))
}
