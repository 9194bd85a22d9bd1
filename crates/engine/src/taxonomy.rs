//! Domain and project-type vocabulary shared by the structure validator and the classifier.

use repolens_protocol::Blueprint;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Content,
    Product,
    Service,
    Commerce,
    Personal,
    DeveloperTools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Blog,
    Landing,
    Saas,
    Dashboard,
    Ecommerce,
    Portfolio,
    Docs,
    InternalTool,
    Api,
    Script,
}

impl ProjectType {
    /// Fixed type → blueprint table used by forced overrides and classifier agreement.
    pub fn blueprint(self) -> Blueprint {
        match self {
            ProjectType::Blog => Blueprint::ContentSite,
            ProjectType::Landing => Blueprint::LandingCro,
            ProjectType::Saas => Blueprint::SaasApp,
            ProjectType::Dashboard => Blueprint::Dashboard,
            ProjectType::Ecommerce => Blueprint::Ecommerce,
            ProjectType::Portfolio => Blueprint::Portfolio,
            ProjectType::Docs => Blueprint::Documentation,
            ProjectType::InternalTool => Blueprint::InternalTool,
            ProjectType::Api => Blueprint::ApiService,
            ProjectType::Script => Blueprint::AutomationScript,
        }
    }
}
