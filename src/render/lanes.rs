use crate::layout::BookingSegment;

/// Stack overlapping bars within each week row.
///
/// Segments are visited in order; each takes the lowest lane not already
/// held by an overlapping segment on the same row. Earlier bookings therefore
/// sit above later ones.
pub fn assign_lanes(segments: &[BookingSegment]) -> Vec<usize> {
    let mut lanes: Vec<usize> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let taken: Vec<usize> = segments[..i]
            .iter()
            .zip(&lanes)
            .filter(|(other, _)| other.overlaps(segment))
            .map(|(_, &lane)| lane)
            .collect();

        let lane = (0..).find(|lane| !taken.contains(lane)).unwrap_or(0);
        lanes.push(lane);
    }

    lanes
}
