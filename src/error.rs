//! Erros de conversão, análise e liquidação.

/// Erro de parsing ou de conciliação dos dados recebidos das plataformas.
#[derive(thiserror::Error, Debug)]
pub enum ConciliaError {
    /// Erro de entrada/saída ao ler um snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Payload JSON fora do formato esperado.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Data fora dos formatos aceitos.
    #[error("Invalid date '{value}'")]
    Date {
        /// Valor original da data.
        value: String,
    },
    /// Valor monetário que não pôde ser interpretado.
    #[error("Invalid amount '{value}' in field '{field}'")]
    Amount {
        /// Valor original.
        value: String,
        /// Campo de origem.
        field: &'static str,
    },
    /// Valor fora do vocabulário fechado de um campo.
    #[error("Unrecognized value '{value}' in field '{field}'")]
    Value {
        /// Valor original.
        value: String,
        /// Campo de origem.
        field: &'static str,
    },
    /// Campo obrigatório ausente no payload.
    #[error("Required field '{field}' missing")]
    MissingField {
        /// Nome do campo ausente.
        field: &'static str,
    },
}
