mod scanner;

pub use scanner::ObstacleScanner;
