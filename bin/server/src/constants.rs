/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: &str = "8080";

/// Eager transformations requested when none are configured
pub const DEFAULT_EAGER: &str = "w_400,h_300,c_pad|w_260,h_200,c_crop";

/// Default connect timeout towards the image host, in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: &str = "10";

/// Default read timeout towards the image host, in seconds
pub const DEFAULT_READ_TIMEOUT_SECONDS: &str = "30";

/// Entity name carried by user commands
pub const USER_ENTITY: &str = "USER";

/// Office offered by the built-in user directory
pub const HEAD_OFFICE_ID: u64 = 1;
pub const HEAD_OFFICE_NAME: &str = "Head Office";

/// Keys a user representation may expose
pub const RESPONSE_DATA_PARAMETERS: [&str; 14] = [
    "id",
    "officeId",
    "officeName",
    "username",
    "firstname",
    "lastname",
    "email",
    "allowedOffices",
    "availableRoles",
    "selectedRoles",
    "staff",
    "frontId",
    "photoOfIndividual",
    "backId",
];
