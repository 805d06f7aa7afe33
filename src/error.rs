use thiserror::Error;

/// The one error kind a malformed or unsatisfiable input produces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unable to parse '{0}' as roll")]
    InvalidRoll(String),
    #[error("cannot parse '{0}' as expression")]
    InvalidExpression(String),
    #[error("invalid table string '{0}'")]
    InvalidTable(String),
    #[error("table '{table}' has no entry for key '{key}'")]
    MissingTableKey { table: String, key: String },
    #[error("invalid modifier: '{0}'")]
    InvalidModifier(String),
    #[error("modifier '{0}' has no preceding roll or group to modify")]
    DanglingModifier(String),
    #[error("invalid multiplier: '{0}'; the repeat count must be positive")]
    InvalidMultiplier(String),
    #[error("multiplier '{0}' has no preceding roll or group to repeat")]
    DanglingMultiplier(String),
    #[error("invalid tag: {0}")]
    UnknownTag(String),
    #[error("arg missing after '{0}' tag")]
    MissingYieldTarget(String),
    #[error("unable to yield arg: {0}. Arg must be a valid stat tag, such as '-mean' or '-total'")]
    InvalidYieldTarget(String),
    #[error("unable to parse group from '{0}' due to missing ']' for the opening '['")]
    UnclosedGroup(String),
    #[error("unexpected ']' without a matching '[' in '{0}'")]
    UnopenedGroup(String),
    #[error("multiplier '{token}' repeats more than {max} times")]
    MultiplierTooLarge { token: String, max: usize },
    #[error("cannot build a group from zero tokens")]
    EmptyGroup,
    #[error("macro '{0}' expands too deeply; is it recursive?")]
    MacroRecursion(String),
}

#[derive(Error, Debug)]
pub enum RollError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("too many dice rolled; the limit is {0}")]
    TooManyRolls(usize),
    #[error("failed to write roll output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
