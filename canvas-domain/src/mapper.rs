//! # Mapper Layer (C2)
//!
//! Each mapper is bijective between three representations: wire (serialized
//! form), DTO (validated record), and domain (invariants-bearing record).
//! Replaces the inheritance-hierarchy "mapper hierarchies" pattern the spec
//! flags in §9 with a flat, four-function capability set.

use crate::error::CanvasError;

/// Bijective conversion between a wire representation, a validated DTO, and
/// a domain record.
///
/// Implementors must satisfy, for every well-formed domain value `d`:
/// `from_wire(to_wire(d)) == d`. Identity mappers
/// (`Dto == Domain`) simply hand the input back by reference via a
/// `Clone`-backed pass-through — see [`IdentityMapper`].
pub trait Mapper<Wire, Dto, Domain> {
    fn from_wire(&self, wire: Wire) -> Result<Dto, CanvasError>;
    fn to_wire(&self, dto: &Dto) -> Result<Wire, CanvasError>;
    fn from_dto(&self, dto: Dto) -> Result<Domain, CanvasError>;
    fn to_dto(&self, domain: &Domain) -> Result<Dto, CanvasError>;
}

/// The wire-level encoding of "absent" is the empty string; parsing a blank
/// string yields `None`. Shared by every mapper implementation
/// instead of being reimplemented per mapper.
pub fn blank_is_absent(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Requires a field to be present, failing with `InvalidInput` otherwise
/// (spec §4.2: "any missing required identifier ... fails with
/// InvalidInput").
pub fn require_present<'a>(raw: &'a str, field: &str) -> Result<&'a str, CanvasError> {
    blank_is_absent(raw).ok_or_else(|| CanvasError::invalid_input(format!("missing required field '{field}'")))
}

/// An identity mapper for types where DTO and domain coincide: `Dto`
/// round-trips through `Domain` by cloning rather than transforming.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityMapper;

impl<Wire, T> Mapper<Wire, T, T> for IdentityMapper
where
    T: Clone + TryFrom<Wire, Error = CanvasError> + TryInto<Wire, Error = CanvasError>,
{
    fn from_wire(&self, wire: Wire) -> Result<T, CanvasError> {
        T::try_from(wire)
    }

    fn to_wire(&self, dto: &T) -> Result<Wire, CanvasError> {
        dto.clone().try_into()
    }

    fn from_dto(&self, dto: T) -> Result<T, CanvasError> {
        Ok(dto)
    }

    fn to_dto(&self, domain: &T) -> Result<T, CanvasError> {
        Ok(domain.clone())
    }
}
