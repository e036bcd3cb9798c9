//! Client-side reassembly of multi-fragment `ObjectEnum`/`ObjectInfo`
//! responses.
//!
//! A single response buffer may not hold an entire enumeration or object
//! description; the server marks a response incomplete and the client
//! issues a follow-up request for the next slice. These helpers fold a
//! newly-received fragment into the one accumulated so far.

use crate::error::{Error, Result};
use crate::response::{ObjectEnumResponse, ObjectInfoResponse};

/// A caller-supplied ceiling on how many fragments a single enumeration or
/// object-info exchange may consume, guarding against a misbehaving or
/// malicious responder that never sets the completion marker.
pub const DEFAULT_MAX_FRAGMENTS: u32 = 4096;

impl ObjectEnumResponse {
    /// Folds `next` into `self`. Fails if `self` is already complete, if
    /// either side carries a non-`Ok` result, or if `fragments_so_far` has
    /// reached `max_fragments`.
    pub fn add_fragment(
        &mut self,
        next: ObjectEnumResponse,
        fragments_so_far: u32,
        max_fragments: u32,
    ) -> Result<()> {
        if self.is_complete() {
            return Err(Error::LogicError(
                "add_fragment called on an already-complete enumeration response".into(),
            ));
        }
        if !self.result().is_ok() || !next.result().is_ok() {
            return Err(Error::LogicError(
                "add_fragment requires both responses to carry an Ok result".into(),
            ));
        }
        if fragments_so_far >= max_fragments {
            return Err(Error::OutOfRange(format!(
                "enumeration exceeded the {max_fragments}-fragment limit"
            )));
        }
        let accumulated = self.indices()?;
        let indices = next.indices()?;
        if let (Some(&last), Some(&first)) = (accumulated.last(), indices.first()) {
            if last >= first {
                return Err(Error::InvalidArgument(
                    "fragment indices are not a continuation of the accumulated listing".into(),
                ));
            }
        }
        if accumulated.len() + indices.len() > crate::size::MAX_INDEX_CAPACITY as usize {
            return Err(Error::LogicError(
                "add_fragment would exceed the maximum number of indices".into(),
            ));
        }
        let complete = next.is_complete();
        let indices = indices.to_vec();
        self.extend_with(indices, complete);
        Ok(())
    }
}

impl ObjectInfoResponse {
    /// Folds `next` into `self`. Fails if `self` is already complete, if
    /// either side carries a non-`Ok` result, or if `fragments_so_far` has
    /// reached `max_fragments`.
    pub fn add_fragment(
        &mut self,
        next: ObjectInfoResponse,
        fragments_so_far: u32,
        max_fragments: u32,
    ) -> Result<()> {
        if self.is_complete() {
            return Err(Error::LogicError(
                "add_fragment called on an already-complete object-info response".into(),
            ));
        }
        if !self.result().is_ok() || !next.result().is_ok() {
            return Err(Error::LogicError(
                "add_fragment requires both responses to carry an Ok result".into(),
            ));
        }
        if fragments_so_far >= max_fragments {
            return Err(Error::OutOfRange(format!(
                "object-info fetch exceeded the {max_fragments}-fragment limit"
            )));
        }
        let complete = next.is_complete();
        let subindices = next.subindices()?.to_vec();
        self.extend_with(subindices, complete);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort_code::AbortCode;
    use crate::access::Attributes;
    use roda_dtyp::DataType;

    #[test]
    fn object_enum_fragments_merge_in_order() {
        let mut acc = ObjectEnumResponse::new_fragment(vec![0x1000, 0x1001], false).unwrap();
        let next = ObjectEnumResponse::new_fragment(vec![0x1018], true).unwrap();
        acc.add_fragment(next, 1, DEFAULT_MAX_FRAGMENTS).unwrap();
        assert!(acc.is_complete());
        assert_eq!(acc.indices().unwrap(), &[0x1000, 0x1001, 0x1018]);
    }

    #[test]
    fn object_enum_rejects_fragment_after_completion() {
        let mut acc = ObjectEnumResponse::new_fragment(vec![0x1000], true).unwrap();
        let next = ObjectEnumResponse::new_fragment(vec![0x1001], true).unwrap();
        assert!(acc.add_fragment(next, 1, DEFAULT_MAX_FRAGMENTS).is_err());
    }

    #[test]
    fn object_enum_respects_max_fragments() {
        let mut acc = ObjectEnumResponse::new_fragment(vec![0x1000], false).unwrap();
        let next = ObjectEnumResponse::new_fragment(vec![0x1001], false).unwrap();
        assert!(acc.add_fragment(next, 4096, 4096).is_err());
    }

    #[test]
    fn object_enum_rejects_fragment_with_error_result() {
        let mut acc = ObjectEnumResponse::new_fragment(vec![0x1000], false).unwrap();
        let next = ObjectEnumResponse::new_error(AbortCode::GeneralError).unwrap();
        assert!(acc.add_fragment(next, 1, DEFAULT_MAX_FRAGMENTS).is_err());
    }

    #[test]
    fn object_enum_rejects_discontinuous_fragment() {
        let mut acc = ObjectEnumResponse::new_fragment(vec![0x1000, 0x1020], false).unwrap();
        let next = ObjectEnumResponse::new_fragment(vec![0x1010], true).unwrap();
        assert!(acc.add_fragment(next, 1, DEFAULT_MAX_FRAGMENTS).is_err());
    }

    #[test]
    fn object_info_fragments_merge_in_order() {
        let first = crate::response::SubIndexInfo {
            subindex: 0,
            data_type: DataType::Unsigned8,
            attributes: Attributes::new().with_readable(true),
            max_size: 8,
            name: None,
            app_specific_meta: None,
        };
        let second = crate::response::SubIndexInfo {
            subindex: 1,
            data_type: DataType::Unsigned32,
            attributes: Attributes::new().with_readable(true).with_writable(true),
            max_size: 32,
            name: None,
            app_specific_meta: None,
        };
        let mut acc = ObjectInfoResponse::new_fragment(vec![first.clone()], false);
        let next = ObjectInfoResponse::new_fragment(vec![second.clone()], true);
        acc.add_fragment(next, 1, DEFAULT_MAX_FRAGMENTS).unwrap();
        assert!(acc.is_complete());
        assert_eq!(acc.subindices().unwrap(), &[first, second]);
    }
}
