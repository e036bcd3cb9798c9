//! Response-size budgeting.
//!
//! A requester bounds how large a response it is willing to receive via
//! `maxResponseSize`. These helpers turn that budget into the concrete
//! capacity a responder may use once the fixed overhead (common header,
//! return stack, result code) is subtracted.

/// The smallest `maxResponseSize` a caller may request. Below this, there
/// is not even room for a header, a return stack item, and a result code.
pub const MIN_USEFUL_RESPONSE_SIZE: u32 = 32;

const HEADER_SIZE: u32 = 3;
const RESULT_SIZE: u32 = 4;
const MORE_FRAGMENTS_MARKER_SIZE: u32 = 1;

/// The largest enumeration/info response index space a single response
/// buffer can represent, mirroring the protocol's 16-bit fragment length
/// fields. Beyond this many entries, completeness can only be observed
/// across a second fragment, never within the first.
pub const MAX_INDEX_CAPACITY: u32 = u16::MAX as u32 + 1;

/// How many bytes of payload (beyond the common header, return stack, and
/// result code) a response may use given `maxResponseSize`.
pub fn calc_max_data_payload(max_response_size: u32, return_stack_size_bytes: u32) -> u32 {
    let overhead = HEADER_SIZE + return_stack_size_bytes + RESULT_SIZE;
    max_response_size
        .saturating_sub(overhead)
        .min(u16::MAX as u32)
}

/// How many 16-bit object-dictionary indices fit in a single enumeration
/// response fragment given `maxResponseSize`.
pub fn calc_max_nb_of_indices(max_response_size: u32, return_stack_size_bytes: u32) -> u32 {
    let payload = calc_max_data_payload(max_response_size, return_stack_size_bytes)
        .saturating_sub(MORE_FRAGMENTS_MARKER_SIZE);
    (payload / 2).min(MAX_INDEX_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_budget_subtracts_fixed_overhead() {
        assert_eq!(calc_max_data_payload(32, 0), 32 - 3 - 4);
        assert_eq!(calc_max_data_payload(32, 8), 32 - 3 - 8 - 4);
    }

    #[test]
    fn payload_budget_never_underflows() {
        assert_eq!(calc_max_data_payload(4, 0), 0);
    }

    #[test]
    fn index_capacity_accounts_for_fragment_marker() {
        let nb = calc_max_nb_of_indices(32, 0);
        assert_eq!(nb, (32 - 3 - 4 - 1) / 2);
    }

    #[test]
    fn index_capacity_is_clamped_by_the_payload_budget() {
        // The payload budget itself is capped at u16::MAX, so in practice
        // that cap binds before MAX_INDEX_CAPACITY ever would.
        let nb = calc_max_nb_of_indices(u32::MAX, 0);
        assert_eq!(nb, (u16::MAX as u32 - 1) / 2);
        assert!(nb < MAX_INDEX_CAPACITY);
    }
}
