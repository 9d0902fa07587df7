pub const AUTHORIZATION: &str = "Authorization";
pub const EMPTY: &str = "";
pub const MESSAGE_INVALID_TOKEN: &str = "Invalid token, please login again";

// Routes reachable without a bearer token
pub const IGNORE_ROUTES: [&str; 2] = ["/register", "/login"];

// seconds
pub const ONE_WEEK: usize = 7 * 24 * 60 * 60;

// Owners may edit a transaction for this long after it was created
pub const EDIT_WINDOW_HOURS: i64 = 3;

// Amounts are stored as NUMERIC(14, 2)
pub const AMOUNT_SCALE: i64 = 2;
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;
