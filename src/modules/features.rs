//! Built-in feature modules and the application's root route table.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::modules::{LoadError, LoaderRef, ModuleKey, ModuleLoader};
use crate::routing::table::{RouteEntry, RouteTable, TableError};

/// Where unmatched and root paths end up.
pub const HOME: &str = "/dashboard";

/// Feature areas of the administration dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureArea {
    Auth,
    Dashboard,
    Leads,
    Students,
    Batches,
    Employees,
    Placements,
    Reports,
}

impl FeatureArea {
    pub const ALL: [FeatureArea; 8] = [
        FeatureArea::Auth,
        FeatureArea::Dashboard,
        FeatureArea::Leads,
        FeatureArea::Students,
        FeatureArea::Batches,
        FeatureArea::Employees,
        FeatureArea::Placements,
        FeatureArea::Reports,
    ];

    /// URL segment and module key of the area.
    pub fn path(self) -> &'static str {
        match self {
            FeatureArea::Auth => "auth",
            FeatureArea::Dashboard => "dashboard",
            FeatureArea::Leads => "leads",
            FeatureArea::Students => "students",
            FeatureArea::Batches => "batches",
            FeatureArea::Employees => "employees",
            FeatureArea::Placements => "placements",
            FeatureArea::Reports => "reports",
        }
    }

    pub fn key(self) -> ModuleKey {
        ModuleKey::new(self.path())
    }

    /// `(path, component)` pairs of the area's pages.
    fn pages(self) -> &'static [(&'static str, &'static str)] {
        match self {
            FeatureArea::Auth => &[("login", "LoginPage"), ("register", "RegisterPage")],
            FeatureArea::Dashboard => &[("", "DashboardOverviewPage")],
            FeatureArea::Leads => &[
                ("", "LeadListPage"),
                ("new", "LeadFormPage"),
                ("follow-up", "LeadFollowUpPage"),
                ("statistics", "LeadStatisticsPage"),
            ],
            FeatureArea::Students => &[
                ("", "StudentListPage"),
                ("new", "StudentFormPage"),
                ("unassigned", "UnassignedStudentsPage"),
                ("statistics", "StudentStatisticsPage"),
            ],
            FeatureArea::Batches => &[
                ("", "BatchListPage"),
                ("new", "BatchFormPage"),
                ("utilization", "BatchUtilizationPage"),
            ],
            FeatureArea::Employees => &[("", "EmployeeListPage"), ("new", "EmployeeFormPage")],
            FeatureArea::Placements => &[
                ("", "PlacementListPage"),
                ("new", "PlacementFormPage"),
                ("companies", "CompanyListPage"),
            ],
            FeatureArea::Reports => &[
                ("", "ReportsOverviewPage"),
                ("revenue", "RevenueReportPage"),
                ("enrollment", "EnrollmentReportPage"),
                ("placement", "PlacementReportPage"),
                ("lead-conversion", "LeadConversionReportPage"),
                ("batch-utilization", "BatchUtilizationReportPage"),
                ("faculty-performance", "FacultyPerformanceReportPage"),
            ],
        }
    }

    /// Nested route table of the area.
    pub fn routes(self) -> Result<RouteTable, TableError> {
        let mut entries = Vec::new();
        let fallback = match self {
            // Auth has no index page
            FeatureArea::Auth => {
                entries.push(RouteEntry::redirect("", "login", true));
                "login"
            }
            _ => "",
        };
        entries.extend(
            self.pages()
                .iter()
                .map(|(path, component)| RouteEntry::page(*path, *component)),
        );
        entries.push(RouteEntry::fallback(fallback));
        RouteTable::nested(entries)
    }

    pub fn loader(self) -> LoaderRef {
        LoaderRef::new(self.path(), Arc::new(FeatureLoader { area: self }))
    }
}

/// Loader for a built-in feature area.
#[derive(Debug, Clone, Copy)]
pub struct FeatureLoader {
    area: FeatureArea,
}

impl ModuleLoader for FeatureLoader {
    fn load(&self) -> BoxFuture<'static, Result<RouteTable, LoadError>> {
        let area = self.area;
        Box::pin(async move {
            area.routes().map_err(|source| LoadError::InvalidTable {
                module: area.key(),
                source,
            })
        })
    }
}

/// Root route table of the dashboard.
pub fn app_routes() -> Result<RouteTable, TableError> {
    app_routes_with(FeatureArea::loader)
}

/// Root route table with custom loaders, e.g. for instrumented tests.
pub fn app_routes_with<F>(mut loader_for: F) -> Result<RouteTable, TableError>
where
    F: FnMut(FeatureArea) -> LoaderRef,
{
    let mut entries = vec![RouteEntry::redirect("", HOME, true)];
    entries.extend(
        FeatureArea::ALL
            .iter()
            .map(|area| RouteEntry::lazy(area.path(), loader_for(*area))),
    );
    entries.push(RouteEntry::fallback(HOME));
    RouteTable::new(entries)
}
