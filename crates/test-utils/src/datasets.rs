//! Small on-disk datasets for loader and pipeline tests.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Facility CSV in the shape of the public wind farm listing.
pub const FACILITIES_CSV: &str = "\
id,name,latitude,longitude,capacity_mw,annual_generation_mwh,status,operator,hub_height_m,turbine_count
1,Gangwon Ridge,37.70,128.70,40.0,500,operating,KEPCO,80,20
2,Yeongdeok Coast,36.40,129.40,39.6,100,operating,,,
3,Jeju Hangwon,33.55,126.85,21.0,300,operating,Jeju Energy,,7
4,Saemangeum Offshore,35.80,126.40,99.0,0,candidate,,,
";

/// Weather CSV using the ASOS hourly export column names.
pub const WEATHER_CSV: &str = "\
stnId,tm,lat,lon,ws,wd,ta,hm
100,2024-01-01 00:00,37.68,128.72,6.5,270,-3.1,40
100,2024-01-01 01:00,37.68,128.72,7.5,280,-3.4,42
277,2024-01-01 00:00,36.42,129.38,4.0,200,1.2,55
184,2024-01-01 00:00,33.51,126.53,0.0,,6.4,70
";

/// A temporary directory holding dataset files.
pub struct DatasetDir {
    pub dir: TempDir,
}

impl DatasetDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write a file into the directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("write dataset");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for DatasetDir {
    fn default() -> Self {
        Self::new()
    }
}
