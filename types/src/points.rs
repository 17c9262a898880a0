/// Point values a question may be worth.
pub const ALLOWED_POINTS: [i64; 3] = [5, 10, 15];
