// 用户错误
// 11xxx
pub const USER_NOT_FOUND: u32 = 11001;
pub const USER_ALREADY_EXISTS: u32 = 11002;
pub const INVALID_PASSWORD: u32 = 11003;
pub const INVALID_VERIFICATION_CODE: u32 = 11004;
pub const PERMISSION_DENIED: u32 = 11005;
pub const SMS_SEND_FAILED: u32 = 11006;
pub const INVALID_PHONE: u32 = 11007;
pub const PASSWORD_HASH_ERROR: u32 = 11008;

// token错误
// 12xxx
pub const INVALID_TOKEN: u32 = 12001;
pub const TOKEN_EXPIRED: u32 = 12002;
pub const MISSING_TOKEN: u32 = 12003;
pub const TOKEN_CREATION_ERROR: u32 = 12004;
pub const TOKEN_REVOKED: u32 = 12005;

// db错误
// 13xxx
pub const SOMETHING_WENT_WRONG: u32 = 13001;
pub const UNIQUE_CONSTRAINT_VIOLATION: u32 = 13002;

// 视频错误
// 14xxx
pub const VIDEO_NOT_FOUND: u32 = 14001;
pub const ALREADY_LIKED: u32 = 14002;
pub const ALREADY_FAVORITED: u32 = 14003;
pub const UNSUPPORTED_VIDEO_TYPE: u32 = 14004;

// 饮食错误
// 15xxx
pub const INVALID_MEAL_TYPE: u32 = 15001;
pub const EMPTY_DIET_ITEMS: u32 = 15002;
pub const INVALID_DATE: u32 = 15003;
pub const INVALID_DATE_RANGE: u32 = 15004;

// request错误
// 20xxx
pub const VALIDATION_ERROR: u32 = 20001;
pub const JSON_REJECTION: u32 = 20002;
pub const QUERY_REJECTION: u32 = 20003;
pub const COMMON_REQUEST_ERROR: u32 = 20004;
