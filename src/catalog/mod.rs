//! Static organization catalog
//!
//! This module holds the compiled-in reference data: which organizations
//! exist, where their data lives, how they are branded, and which KPIs each
//! dashboard tab shows.

pub mod metric_kind;

pub use metric_kind::{Direction, Favorability, MetricKind, metric_kind_for};

use serde::Serialize;

use crate::core::error::{KpiDashError, Result};

/// Display color and logo reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Branding {
    pub primary_color: &'static str,
    pub logo_url: &'static str,
}

/// Mandate, vision and strategic plan summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub mandate: &'static str,
    pub vision: &'static str,
    pub strategic_plan: &'static str,
}

/// Ordered KPI columns shown under one dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub name: &'static str,
    pub kpis: &'static [&'static str],
}

/// Parameters of a synthesized regional breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionalSpec {
    /// KPI column the breakdown splits
    pub kpi: &'static str,
    /// Tab that shows the breakdown
    pub tab: &'static str,
    pub base_mean: f64,
    pub base_std_dev: f64,
    /// Improvement added across the full series, in percentage points
    pub ramp_scale: f64,
    pub capital_mean: f64,
    pub capital_std_dev: f64,
    pub other_mean: f64,
    pub other_std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Organization {
    pub name: &'static str,
    pub file_name: &'static str,
    pub branding: Branding,
    pub profile: Profile,
    pub tabs: &'static [Tab],
    pub regional: Option<RegionalSpec>,
}

impl Organization {
    /// Tab by name, case-insensitive
    pub fn tab(&self, name: &str) -> Option<&'static Tab> {
        self.tabs
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn tab_or_err(&self, name: &str) -> Result<&'static Tab> {
        self.tab(name).ok_or_else(|| KpiDashError::UnknownTab {
            organization: self.name.to_string(),
            tab: name.to_string(),
        })
    }

    /// First tab, the overview
    pub fn default_tab(&self) -> &'static Tab {
        &self.tabs[0]
    }

    pub fn tab_names(&self) -> Vec<&'static str> {
        self.tabs.iter().map(|t| t.name).collect()
    }

    /// Every KPI named by any tab, first-seen order
    pub fn all_kpis(&self) -> Vec<&'static str> {
        let mut kpis: Vec<&'static str> = Vec::new();
        for kpi in self.tabs.iter().flat_map(|t| t.kpis.iter()) {
            if !kpis.contains(kpi) {
                kpis.push(kpi);
            }
        }
        kpis
    }
}

static ORGANIZATIONS: [Organization; 5] = [
    Organization {
        name: "EUCL",
        file_name: "EUCL_kpi_data.csv",
        branding: Branding {
            primary_color: "#008000",
            logo_url: "https://placehold.co/100x100/008000/FFFFFF?text=EUCL",
        },
        profile: Profile {
            mandate: "Providing energy utility services in Rwanda through operations and maintenance of existing generation plants, transmission and distribution networks, and retail of electricity to end-users.",
            vision: "To be the leading regional provider of innovative and sustainable energy solutions for national development.",
            strategic_plan: "Focuses on improving efficiency in utility operations, progressive system loss reduction, enhancing billing and collection efficiency, improving network reliability and quality of service, and optimizing generation capacity to meet growing demand.",
        },
        tabs: &[
            Tab {
                name: "Overview",
                kpis: &[
                    "Electricity Access Rate (%)",
                    "System Loss Rate (%)",
                    "Average Outage Duration (SAIDI)",
                ],
            },
            Tab {
                name: "Operational Efficiency",
                kpis: &[
                    "Electricity Access Rate (%)",
                    "System Loss Rate (%)",
                    "Average Outage Duration (SAIDI)",
                    "Customer Complaints Resolution Time (days)",
                ],
            },
            Tab {
                name: "Financials & Projects",
                kpis: &[
                    "Revenue",
                    "Expenses",
                    "EBITDA",
                    "Billing Efficiency (%)",
                    "Collection Efficiency (%)",
                    "Number of New Connections (per quarter)",
                    "Operational Expenditure per kWh",
                    "Revenue per kWh Sold",
                ],
            },
        ],
        regional: Some(RegionalSpec {
            kpi: "Electricity Access Rate (%)",
            tab: "Operational Efficiency",
            base_mean: 70.0,
            base_std_dev: 5.0,
            ramp_scale: 20.0,
            capital_mean: 10.0,
            capital_std_dev: 2.0,
            other_mean: -5.0,
            other_std_dev: 3.0,
        }),
    },
    Organization {
        name: "EDCL",
        file_name: "EDCL_kpi_data.csv",
        branding: Branding {
            primary_color: "#004F9F",
            logo_url: "https://placehold.co/100x100/004F9F/FFFFFF?text=EDCL",
        },
        profile: Profile {
            mandate: "Increasing investment in and development of new energy generation projects in a timely and cost-efficient manner, developing appropriate transmission infrastructure, and planning/executing energy access projects to meet national targets.",
            vision: "To be the leading regional provider of innovative and sustainable energy solutions for national development.",
            strategic_plan: "Aims to expand energy supply capacity efficiently, develop least-cost energy development plans, direct the Electricity Access Roll-Out Program, and undertake economic/technical studies for infrastructure development.",
        },
        tabs: &[
            Tab {
                name: "Overview",
                kpis: &[
                    "New Generation Capacity Developed (MW)",
                    "Projects Delivered On-Time (%)",
                    "% of Funds Disbursed (Capex)",
                ],
            },
            Tab {
                name: "Project Performance",
                kpis: &[
                    "New Generation Capacity Developed (MW)",
                    "Projects Delivered On-Time (%)",
                ],
            },
            Tab {
                name: "Financial & Compliance",
                kpis: &[
                    "Revenue",
                    "Expenses",
                    "EBITDA",
                    "Cost per MW Installed",
                    "% of Funds Disbursed (Capex)",
                    "Loan Absorption Rate (%)",
                ],
            },
        ],
        regional: None,
    },
    Organization {
        name: "WASAC",
        file_name: "WASAC_kpi_data.csv",
        branding: Branding {
            primary_color: "#007BFF",
            logo_url: "https://placehold.co/100x100/007BFF/FFFFFF?text=WASAC",
        },
        profile: Profile {
            mandate: "Responsible for developing water and sanitation projects, implementing government-led initiatives, and providing safe and reliable water and sanitation services across Rwanda.",
            vision: "Providing safe and reliable water and sanitation services.",
            strategic_plan: "Focuses on strengthening governance of water resources, preventing soil erosion, ensuring sufficient quality water availability, enhancing resilience to flooding, and strengthening organizational capacity and financial sustainability.",
        },
        tabs: &[
            Tab {
                name: "Overview",
                kpis: &[
                    "Water Coverage Rate (%)",
                    "Non-Revenue Water (NRW %)",
                    "Average Water Outage Duration",
                ],
            },
            Tab {
                name: "Water Supply & Quality",
                kpis: &[
                    "Water Coverage Rate (%)",
                    "Non-Revenue Water (NRW %)",
                    "% of Water Quality Tests Passed",
                ],
            },
            Tab {
                name: "Sanitation & Assets",
                kpis: &[
                    "Sewerage Network Coverage (%)",
                    "Average Water Outage Duration",
                ],
            },
        ],
        regional: Some(RegionalSpec {
            kpi: "Water Coverage Rate (%)",
            tab: "Water Supply & Quality",
            base_mean: 60.0,
            base_std_dev: 5.0,
            ramp_scale: 15.0,
            capital_mean: 15.0,
            capital_std_dev: 3.0,
            other_mean: -10.0,
            other_std_dev: 4.0,
        }),
    },
    Organization {
        name: "King Faisal Hospital",
        file_name: "King_Faisal_Hospital_kpi_data.csv",
        branding: Branding {
            primary_color: "#1E90FF",
            logo_url: "https://placehold.co/100x100/1E90FF/FFFFFF?text=KFH",
        },
        profile: Profile {
            mandate: "Provide specialized healthcare in East and Central Africa, focusing on clinical excellence, efficiency, and quality in health service delivery.",
            vision: "A center of excellence in health service provision, clinical education and research.",
            strategic_plan: "Aims to harness human capital, modern technology, and research capacity to improve patient outcomes, enhance corporate communication, and foster a patient-centered culture. Contributes to Rwanda's Health Sector Strategic Plan priorities.",
        },
        tabs: &[
            Tab {
                name: "Overview",
                kpis: &[
                    "Bed Occupancy Rate (%)",
                    "Average Length of Stay (ALOS)",
                    "Outpatient Visits per Month",
                ],
            },
            Tab {
                name: "Patient Care Metrics",
                kpis: &[
                    "Bed Occupancy Rate (%)",
                    "Average Length of Stay (ALOS)",
                    "Mortality Rate",
                    "Patient Satisfaction Score",
                ],
            },
            Tab {
                name: "Operational & Financial",
                kpis: &[
                    "Revenue",
                    "Expenses",
                    "EBITDA",
                    "Outpatient Visits per Month",
                    "Insurance Claims Reimbursement Rate (%)",
                ],
            },
        ],
        regional: None,
    },
    Organization {
        name: "Rwanda Medical Supply",
        file_name: "Rwanda_Medical_Supply_kpi_data.csv",
        branding: Branding {
            primary_color: "#28a745",
            logo_url: "https://placehold.co/100x100/28a745/FFFFFF?text=RMS",
        },
        profile: Profile {
            mandate: "Ensuring the availability and accessibility of quality essential medicines, medical devices, and health commodities throughout Rwanda.",
            vision: "To be a world-class, self-sustaining medical supply chain organization, ensuring health security for all Rwandans.",
            strategic_plan: "Prioritizes strengthening stakeholder engagement and customer satisfaction, improving order fulfillment rate, enhancing financial and operational efficiency, and adhering to quality standards and regulations.",
        },
        tabs: &[
            Tab {
                name: "Overview",
                kpis: &[
                    "Stock Availability Rate (%)",
                    "Order Fulfillment Rate (%)",
                    "Inventory Turnover Ratio",
                ],
            },
            Tab {
                name: "Supply Chain Efficiency",
                kpis: &[
                    "Stock Availability Rate (%)",
                    "Order Fulfillment Rate (%)",
                    "% of Expired Stock",
                ],
            },
            Tab {
                name: "Financials & Quality",
                kpis: &[
                    "Revenue",
                    "Expenses",
                    "EBITDA",
                    "Health Facility Satisfaction Score",
                ],
            },
        ],
        regional: None,
    },
];

/// Every organization, in dashboard order
pub fn organizations() -> &'static [Organization] {
    &ORGANIZATIONS
}

/// Look up an organization by name, case-insensitive
pub fn find(name: &str) -> Result<&'static Organization> {
    let wanted = name.trim();
    ORGANIZATIONS
        .iter()
        .find(|o| o.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| KpiDashError::UnknownOrganization(wanted.to_string()))
}

/// First organization of the catalog
pub fn default_organization() -> &'static Organization {
    &ORGANIZATIONS[0]
}
