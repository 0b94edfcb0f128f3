/// Fixed-risk position sizing: the quantity whose loss at the stop-loss
/// level equals `risk_per_trade`.
///
/// `risk_per_share` is `entry_price * |stop_loss_fraction|`. A degenerate
/// stop-loss of exactly zero yields a size of zero; that is a defined
/// outcome, not an error.
pub fn position_size(entry_price: f64, stop_loss_fraction: f64, risk_per_trade: f64) -> f64 {
    let risk_per_share = entry_price * stop_loss_fraction.abs();
    if risk_per_share > 0.0 {
        risk_per_trade / risk_per_share
    } else {
        0.0
    }
}
