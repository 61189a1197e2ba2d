//! Point-set measures
//!
//! Every value of a property is read as one point; the values of a record form
//! its point set. Distances are great-circle distances in kilometres and are
//! turned into similarities with `1 / (1 + d)`.

use crate::measure::Measure;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance in kilometres
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Parse a point value.
///
/// `POINT(lon lat)` follows WKT axis order; a bare pair `lat lon` or `lat,lon`
/// is read latitude first.
pub fn parse_point(value: &str) -> Option<GeoPoint> {
    let value = value.trim();
    let (wkt, body) = match value.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("point") => {
            let body = value[5..].trim().strip_prefix('(')?.strip_suffix(')')?;
            (true, body)
        }
        _ => (false, value),
    };

    let numbers: Vec<f64> = body
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    let [first, second] = numbers.as_slice() else {
        return None;
    };

    if wkt {
        Some(GeoPoint::new(*second, *first))
    } else {
        Some(GeoPoint::new(*first, *second))
    }
}

pub fn distance_to_similarity(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// Compare two point sets with a point-set measure.
///
/// Returns `None` when `measure` is not a point-set measure; an empty set on
/// either side scores 0.0.
pub fn point_set_similarity(a: &[GeoPoint], b: &[GeoPoint], measure: Measure) -> Option<f64> {
    let distance = match measure {
        Measure::Hausdorff => directed_hausdorff(a, b),
        Measure::SymmetricHausdorff => {
            directed_hausdorff(a, b).max(directed_hausdorff(b, a))
        }
        Measure::Frechet => discrete_frechet(a, b),
        Measure::GeoLink => closest_pair(a, b),
        Measure::GeoMean => mean_pairwise(a, b),
        Measure::Surjection => {
            if a.len() >= b.len() {
                mean_nearest(a, b)
            } else {
                mean_nearest(b, a)
            }
        }
        Measure::FairSurjection => (mean_nearest(a, b) + mean_nearest(b, a)) / 2.0,
        _ => return None,
    };

    if a.is_empty() || b.is_empty() {
        return Some(0.0);
    }
    Some(distance_to_similarity(distance))
}

fn nearest(point: &GeoPoint, set: &[GeoPoint]) -> f64 {
    set.iter()
        .map(|other| point.distance_km(other))
        .fold(f64::INFINITY, f64::min)
}

fn directed_hausdorff(a: &[GeoPoint], b: &[GeoPoint]) -> f64 {
    a.iter().map(|p| nearest(p, b)).fold(0.0, f64::max)
}

fn closest_pair(a: &[GeoPoint], b: &[GeoPoint]) -> f64 {
    a.iter().map(|p| nearest(p, b)).fold(f64::INFINITY, f64::min)
}

fn mean_pairwise(a: &[GeoPoint], b: &[GeoPoint]) -> f64 {
    let total: f64 = a
        .iter()
        .flat_map(|p| b.iter().map(move |q| p.distance_km(q)))
        .sum();
    total / (a.len() * b.len()).max(1) as f64
}

fn mean_nearest(from: &[GeoPoint], to: &[GeoPoint]) -> f64 {
    let total: f64 = from.iter().map(|p| nearest(p, to)).sum();
    total / from.len().max(1) as f64
}

/// Discrete Fréchet distance, treating both sets as polylines in value order
fn discrete_frechet(a: &[GeoPoint], b: &[GeoPoint]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    let mut coupling = vec![vec![0.0f64; b.len()]; a.len()];
    for i in 0..a.len() {
        for j in 0..b.len() {
            let d = a[i].distance_km(&b[j]);
            coupling[i][j] = match (i, j) {
                (0, 0) => d,
                (0, _) => coupling[0][j - 1].max(d),
                (_, 0) => coupling[i - 1][0].max(d),
                _ => coupling[i - 1][j]
                    .min(coupling[i - 1][j - 1])
                    .min(coupling[i][j - 1])
                    .max(d),
            };
        }
    }
    coupling[a.len() - 1][b.len() - 1]
}
