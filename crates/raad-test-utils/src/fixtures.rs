// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small versions of the four datasets.

use std::path::Path;

use raad_core::DatasetName;

pub const FILINGS_CSV: &str = "company_name,symbol,sector,fiscal_year,period_end
Saudi Arabian Oil Co.,2222,Energy,2024,2024-12-31
SABIC,2010,Materials,2024,2024-12-31
Al Rajhi Bank,1120,Financials,2024,2024-12-31
";

pub const FACTS_CSV: &str = "company_name,fiscal_year,metric,value
Saudi Arabian Oil Co.,2024,revenue,1600000000000
Saudi Arabian Oil Co.,2024,net_profit,400000000000
SABIC,2024,revenue,140000000000
SABIC,2024,net_profit,1500000000
Al Rajhi Bank,2024,total_assets,900000000000
";

pub const RATIOS_CSV: &str = "company_name,fiscal_year,ratio,value
Saudi Arabian Oil Co.,2024,roe,0.25
SABIC,2024,roe,0.05
SABIC,2024,debt_to_equity,0.6
Al Rajhi Bank,2024,current_ratio,1.1
";

pub const ANALYTICS_CSV: &str = "company_name,sector,fiscal_year,revenue,net_profit,total_assets,roe,scale_factor
Saudi Arabian Oil Co.,Energy,2024,1600000000000,400000000000,2400000000000,0.25,1
SABIC,Materials,2024,140000000000,1500000000,300000000000,0.05,1
Al Rajhi Bank,Financials,2024,30000000000,19000000000,900000000000,0.22,1
SABIC,Materials,2023,141000000000,1200000000,310000000000,0.04,1
";

/// Fixture contents for one dataset.
pub fn csv_for(name: DatasetName) -> &'static str {
    match name {
        DatasetName::Filings => FILINGS_CSV,
        DatasetName::Facts => FACTS_CSV,
        DatasetName::Ratios => RATIOS_CSV,
        DatasetName::Analytics => ANALYTICS_CSV,
    }
}

/// Writes every fixture dataset except `skip` into `dir`.
pub fn write_datasets(dir: &Path, skip: Option<DatasetName>) -> std::io::Result<()> {
    for name in DatasetName::ALL {
        if Some(name) == skip {
            continue;
        }
        std::fs::write(dir.join(name.file_name()), csv_for(name))?;
    }
    Ok(())
}
