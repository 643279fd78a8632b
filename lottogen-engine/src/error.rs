use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Erreur d'E/S : {0}")]
    Io(#[from] std::io::Error),

    #[error("Erreur JSON : {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration invalide : {0}")]
    InvalidConfig(String),

    #[error("Distribution invalide : {0}")]
    InvalidDistribution(String),

    #[error("Échantillonnage pondéré impossible : {0}")]
    Weights(#[from] rand::distr::weighted::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
