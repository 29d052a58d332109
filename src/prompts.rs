//! Instruction sent alongside every uploaded file.

/// Asks for full text extraction, with a structured JSON object for
/// certificates and other recognisable document types.
pub const EXTRACTION_PROMPT: &str = "Extract all text from the document. \
If it is a certificate, extract the key information into a structured JSON object with keys such as \
\"document_type\", \"certificate_title\", \"issuing_organization\", \"recipient_name\", \"achievement\", \
\"certification_date\", and \"certificate_id\". If there's a signer, include a \"signer\" object with \
\"name\" and \"title\". For other document types like invoices or business cards, create a relevant JSON \
structure. For all other images or general documents, return the raw extracted text. \
Do not wrap the JSON output in markdown backticks.";
