use crate::certificate::CertificateRenderer;
use crate::config::Config;
use crate::roster::Roster;
use std::sync::Arc;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub roster: Arc<Roster>,
    pub renderer: Arc<CertificateRenderer>,
    pub tera: Tera,
}
