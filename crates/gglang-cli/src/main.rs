use std::{env, fs, process::ExitCode};

use gglang::{NoopTracer, Runner, StdInput, StdPrint, StderrTracer};

fn main() -> ExitCode {
    let mut file_path: Option<String> = None;
    let mut debug = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--debug" => debug = true,
            _ if file_path.is_none() => file_path = Some(arg),
            _ => {
                eprintln!("usage: gglang <filename> [--debug]");
                return ExitCode::FAILURE;
            }
        }
    }
    let Some(file_path) = file_path else {
        eprintln!("usage: gglang <filename> [--debug]");
        return ExitCode::FAILURE;
    };

    let code = match read_file(&file_path) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let runner = match Runner::new(&code, &file_path) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = if debug {
        runner.run_traced(&mut StdPrint, &mut StdInput, &mut StderrTracer)
    } else {
        runner.run_traced(&mut StdPrint, &mut StdInput, &mut NoopTracer)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_file(file_path: &str) -> Result<String, String> {
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{file_path} is not a file"));
            }
        }
        Err(err) => {
            return Err(format!("cannot read {file_path}: {err}"));
        }
    }
    fs::read_to_string(file_path).map_err(|err| format!("cannot read {file_path}: {err}"))
}
