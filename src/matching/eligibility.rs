use super::hours::normalize_display_hour;
use super::shift::ParsedShift;
use crate::models::RideType;
use std::cmp::Ordering;

impl RideType {
    /// Hours for which a ride is organised
    pub fn hour_whitelist(self) -> &'static [u32] {
        match self {
            RideType::Pickup => &[6, 7, 22, 23],
            RideType::DropOff => &[22, 23, 0, 1, 2, 3],
        }
    }

    /// Operational order in which matched employees are listed. Also the
    /// hour choices offered when booking a ride of this type.
    pub fn priority_sequence(self) -> &'static [u32] {
        match self {
            RideType::Pickup => &[22, 23, 6, 7],
            RideType::DropOff => &[22, 23, 0, 1, 2, 3],
        }
    }

    /// Hour a shift is ranked by: its start for pickups, its normalised end
    /// for drop-offs.
    pub fn rank_hour(self, shift: &ParsedShift) -> u32 {
        match self {
            RideType::Pickup => shift.start_hour,
            RideType::DropOff => normalize_display_hour(shift.end_hour),
        }
    }
}

/// Decide whether a shift generates a ride of the given type, and the hour
/// it ranks at.
pub fn is_eligible(shift: &ParsedShift, ride_type: RideType) -> (bool, u32) {
    let rank_hour = ride_type.rank_hour(shift);
    (ride_type.hour_whitelist().contains(&rank_hour), rank_hour)
}

/// Order two rank hours by the ride type's priority sequence. Hours in the
/// sequence come first; hours outside it fall back to numeric order.
pub fn compare_rank_hours(ride_type: RideType, a: u32, b: u32) -> Ordering {
    let sequence = ride_type.priority_sequence();
    let index_a = sequence.iter().position(|&h| h == a);
    let index_b = sequence.iter().position(|&h| h == b);

    match (index_a, index_b) {
        (Some(ia), Some(ib)) => ia.cmp(&ib),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(&b),
    }
}

/// Stable sort of items by their rank hour
pub fn sort_by_priority<T>(items: &mut [T], ride_type: RideType, rank_hour: impl Fn(&T) -> u32) {
    items.sort_by(|a, b| compare_rank_hours(ride_type, rank_hour(a), rank_hour(b)));
}
