/// Instrumental magnitude `-2.5 log10(flux)`.
///
/// Zero flux gives `+inf` and negative flux gives NaN; neither panics.
pub fn instrumental_magnitude(flux: f64) -> f64 {
    -2.5 * flux.log10()
}

/// Color index `mag1 - mag2` of two fluxes measured in different filters,
/// where `mag = -2.5 log10(flux) + zero_point`.
pub fn calculate_color_index(
    flux_filter1: f64,
    flux_filter2: f64,
    zero_point1: f64,
    zero_point2: f64,
) -> f64 {
    let mag1 = instrumental_magnitude(flux_filter1) + zero_point1;
    let mag2 = instrumental_magnitude(flux_filter2) + zero_point2;
    mag1 - mag2
}

/// Element-wise [`calculate_color_index`] over paired flux series.
///
/// The output has the length of the shorter input.
pub fn color_index_series(
    flux_filter1: &[f64],
    flux_filter2: &[f64],
    zero_point1: f64,
    zero_point2: f64,
) -> Vec<f64> {
    flux_filter1
        .iter()
        .zip(flux_filter2)
        .map(|(&f1, &f2)| calculate_color_index(f1, f2, zero_point1, zero_point2))
        .collect()
}
