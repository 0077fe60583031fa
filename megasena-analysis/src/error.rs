use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    /// Estatísticas ou conferência pedidas antes de qualquer carga de histórico.
    #[error("Nenhum dado disponível: carregue o histórico de concursos primeiro")]
    NoDataAvailable,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
