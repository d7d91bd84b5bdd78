use axum::routing::get;
use axum::Router;

use crate::handlers::exchange;
use crate::state::AppState;

/// Path the exporter is hard-wired to call.
pub const EXCHANGE_PATH: &str = "/bitrix/admin/1c_exchange.php";

/// Mount the exchange endpoint: read phases on GET, file upload on POST.
pub fn router() -> Router<AppState> {
    Router::new().route(
        EXCHANGE_PATH,
        get(exchange::get_exchange).post(exchange::post_exchange),
    )
}
