use std::path::PathBuf;

/// A fake xcresulttool: a shell script that serves canned JSON documents
/// keyed on the query arguments, installed via the XCRESULT_REPORT_TOOL env
/// var on each spawned command. A query with no canned document fails the
/// way a real missing sub-document does.
pub struct StubTool {
  dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl StubTool {
  pub fn new() -> StubTool {
    let dir = tempfile::TempDir::new().unwrap();
    let script = format!(
      "#!/bin/sh\nDIR=\"{}\"\ncase \"$*\" in\n  *\"build-results\"*) cat \"$DIR/build.json\" ;;\n  *\"test-results summary\"*) cat \"$DIR/tests.json\" ;;\n  *\"test-results tests\"*) cat \"$DIR/detail.json\" ;;\n  *\"--legacy\"*) cat \"$DIR/legacy.json\" ;;\n  *) echo \"unexpected query: $*\" >&2; exit 64 ;;\nesac\n",
      dir.path().display()
    );

    let bin = dir.path().join("fake-xcresulttool");
    std::fs::write(&bin, script).unwrap();

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      let mut perms = std::fs::metadata(&bin).unwrap().permissions();
      perms.set_mode(0o755);
      std::fs::set_permissions(&bin, perms).unwrap();
    }

    StubTool { dir }
  }

  pub fn bin(&self) -> PathBuf {
    self.dir.path().join("fake-xcresulttool")
  }

  pub fn path(&self) -> &std::path::Path {
    self.dir.path()
  }

  pub fn serve(&self, name: &str, json: &str) {
    std::fs::write(self.dir.path().join(name), json).unwrap();
  }

  pub fn serve_compact(&self, build: &str, tests: &str, detail: &str) {
    self.serve("build.json", build);
    self.serve("tests.json", tests);
    self.serve("detail.json", detail);
  }

  pub fn serve_legacy(&self, invocation: &str) {
    self.serve("legacy.json", invocation);
  }
}

/// Fixtures describing the same failing run in both schemas: 2 tests with 1
/// failure at FooTests.swift:22, 1 deprecation warning, 1 compiler error at
/// Sources/App.swift, build and test run both failed.
#[allow(dead_code)]
pub fn compact_build_doc() -> String {
  serde_json::json!({
    "actionTitle": "Testing workspace proj",
    "status": "failed",
    "errorCount": 1,
    "warningCount": 1,
    "errors": [ {
      "issueType": "Swift Compiler Error",
      "message": "cannot find 'foo' in scope",
      "sourceURL": "file:///work/proj/Sources/App.swift#StartingLineNumber=9&EndingLineNumber=9"
    } ],
    "warnings": [ {
      "issueType": "Deprecation",
      "message": "'frame' was deprecated"
    } ]
  })
  .to_string()
}

#[allow(dead_code)]
pub fn compact_tests_doc() -> String {
  serde_json::json!({
    "result": "Failed",
    "totalTestCount": 2,
    "failedTests": 1,
    "passedTests": 1,
    "testFailures": [ {
      "testName": "FooTests.testExample()",
      "targetName": "FooTests",
      "failureText": "XCTAssertTrue failed"
    } ]
  })
  .to_string()
}

#[allow(dead_code)]
pub fn compact_detail_doc() -> String {
  serde_json::json!({
    "testNodes": [ {
      "nodeType": "Unit test bundle",
      "name": "FooTests",
      "children": [ {
        "nodeType": "Test Case",
        "name": "FooTests.testExample()",
        "result": "Failed",
        "children": [ {
          "nodeType": "Failure Message",
          "name": "FooTests.swift:22: XCTAssertTrue failed"
        } ]
      } ]
    } ]
  })
  .to_string()
}

/// Same run, legacy wrapped schema. The document location keeps the file at
/// the workspace root and a 0-based line 21 so both schemas resolve to
/// FooTests.swift:22 after normalization.
#[allow(dead_code)]
pub fn legacy_doc() -> String {
  serde_json::json!({
    "_type": { "_name": "ActionsInvocationRecord" },
    "metrics": {
      "testsCount": { "_type": { "_name": "Int" }, "_value": "2" },
      "testsFailedCount": { "_type": { "_name": "Int" }, "_value": "1" },
      "warningCount": { "_type": { "_name": "Int" }, "_value": "1" },
      "errorCount": { "_type": { "_name": "Int" }, "_value": "1" }
    },
    "issues": {
      "errorSummaries": { "_values": [ {
        "issueType": { "_value": "Swift Compiler Error" },
        "message": { "_value": "cannot find 'foo' in scope" },
        "documentLocationInCreatingWorkspace": {
          "url": { "_value": "file:///work/proj/Sources/App.swift#StartingLineNumber=9&EndingLineNumber=9" }
        }
      } ] },
      "warningSummaries": { "_values": [ {
        "issueType": { "_value": "Deprecation" },
        "message": { "_value": "'frame' was deprecated" }
      } ] },
      "testFailureSummaries": { "_values": [ {
        "testCaseName": { "_value": "FooTests.testExample()" },
        "producingTarget": { "_value": "FooTests" },
        "message": { "_value": "XCTAssertTrue failed" },
        "documentLocationInCreatingWorkspace": {
          "url": { "_value": "file:///work/proj/FooTests.swift#StartingLineNumber=21&EndingLineNumber=21" }
        }
      } ] }
    },
    "actions": { "_values": [ {
      "title": { "_value": "Testing workspace proj" },
      "buildResult": { "status": { "_value": "failed" } },
      "actionResult": { "status": { "_value": "failed" } }
    } ] }
  })
  .to_string()
}
